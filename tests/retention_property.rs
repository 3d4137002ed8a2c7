//! Property tests for retention: whatever order writes arrive in, a settled
//! group holds exactly the rows carrying its maximum timestamp.

use chrono::{DateTime, Duration, Utc};
use proptest::prelude::*;

use reelcache::adapters::sqlite::{
    create_migrated_test_pool, SqliteMovieRepository, SqliteSearchRepository,
};
use reelcache::domain::ports::{MovieRepository, SearchRepository};
use reelcache::{Movie, SearchHit};

fn base_time() -> DateTime<Utc> {
    DateTime::from_timestamp_micros(1_700_000_000_000_000).unwrap()
}

fn movie_at(at: DateTime<Utc>) -> Movie {
    Movie {
        movie_id: "301".to_string(),
        name: Some("The Matrix".to_string()),
        alternative_name: None,
        year: Some(1999),
        country: None,
        imdb_rating: None,
        kp_rating: None,
        runtime: None,
        description: None,
        genres: String::new(),
        poster_url: None,
        kp_url: None,
        imdb_url: None,
        requester: "r1".to_string(),
        recorded_at: at,
    }
}

fn hit_at(requester: &str, movie_id: &str, at: DateTime<Utc>) -> SearchHit {
    SearchHit {
        query: "matrix".to_string(),
        movie_id: movie_id.to_string(),
        name: None,
        year: None,
        requester: requester.to_string(),
        recorded_at: at,
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// Writes with arbitrary timestamps in arbitrary order always settle to
    /// a single row carrying the maximum timestamp seen so far.
    #[test]
    fn movie_group_settles_to_newest_write(offsets in prop::collection::vec(0u32..86_400, 1..16)) {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let pool = create_migrated_test_pool().await.unwrap();
            let repo = SqliteMovieRepository::new(pool);
            let base = base_time();

            for &offset in &offsets {
                let at = base + Duration::seconds(i64::from(offset));
                repo.record(&[movie_at(at)]).await.unwrap();
            }

            let survivors = repo.find("301", "r1").await.unwrap();
            let newest = base + Duration::seconds(i64::from(*offsets.iter().max().unwrap()));
            prop_assert_eq!(survivors.len(), 1);
            prop_assert_eq!(survivors[0].recorded_at, newest);
            Ok(())
        })?;
    }

    /// Interleaved writes for two requesters never prune across the
    /// requester boundary; each group settles independently.
    #[test]
    fn retention_is_scoped_per_requester(
        writes in prop::collection::vec((prop::bool::ANY, 0u32..86_400), 1..16)
    ) {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let pool = create_migrated_test_pool().await.unwrap();
            let repo = SqliteSearchRepository::new(pool);
            let base = base_time();

            for &(second_requester, offset) in &writes {
                let requester = if second_requester { "r2" } else { "r1" };
                let at = base + Duration::seconds(i64::from(offset));
                repo.record(&[hit_at(requester, "301", at)]).await.unwrap();
            }

            for requester in ["r1", "r2"] {
                let wanted = requester == "r2";
                let newest = writes
                    .iter()
                    .filter(|(r, _)| *r == wanted)
                    .map(|&(_, offset)| offset)
                    .max();

                let survivors = repo.find("matrix", requester).await.unwrap();
                match newest {
                    Some(offset) => {
                        prop_assert_eq!(survivors.len(), 1);
                        prop_assert_eq!(
                            survivors[0].recorded_at,
                            base + Duration::seconds(i64::from(offset))
                        );
                    }
                    None => prop_assert!(survivors.is_empty()),
                }
            }
            Ok(())
        })?;
    }
}
