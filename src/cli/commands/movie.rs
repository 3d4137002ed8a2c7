use anyhow::Result;
use clap::Args;

use crate::cli::AppContext;
use crate::domain::models::Movie;

#[derive(Args)]
pub struct MovieArgs {
    /// Movie identifier from a search result token
    pub movie_id: String,
}

pub async fn execute(
    ctx: &AppContext,
    args: &MovieArgs,
    requester: &str,
    json: bool,
) -> Result<()> {
    execute_for_id(ctx, &args.movie_id, requester, json).await
}

/// Shared with `open`, which reaches details through a callback token.
pub async fn execute_for_id(
    ctx: &AppContext,
    movie_id: &str,
    requester: &str,
    json: bool,
) -> Result<()> {
    let movie = ctx.lookup.resolve_movie(movie_id, requester).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&movie)?);
        return Ok(());
    }

    match movie {
        Some(movie) => render_card(&movie),
        None => println!("No cached details for movie {movie_id}. Search for it first."),
    }
    Ok(())
}

fn render_card(movie: &Movie) {
    println!("{}", movie.title());
    if let Some(alt) = movie.alternative_name.as_deref() {
        println!("  Also known as: {alt}");
    }
    if let Some(year) = movie.year {
        println!("  Year:    {year}");
    }
    if let Some(country) = movie.country.as_deref() {
        println!("  Country: {country}");
    }
    if !movie.genres.is_empty() {
        println!("  Genres:  {}", movie.genres);
    }
    if let Some(runtime) = movie.runtime {
        println!("  Runtime: {runtime} min");
    }
    match (movie.kp_rating, movie.imdb_rating) {
        (Some(kp), Some(imdb)) => println!("  Rating:  KP {kp:.1} / IMDb {imdb:.1}"),
        (Some(kp), None) => println!("  Rating:  KP {kp:.1}"),
        (None, Some(imdb)) => println!("  Rating:  IMDb {imdb:.1}"),
        (None, None) => {}
    }
    if let Some(description) = movie.description.as_deref() {
        println!("\n{description}");
    }
    for url in [&movie.kp_url, &movie.imdb_url, &movie.poster_url]
        .into_iter()
        .flatten()
    {
        println!("  {url}");
    }
}
