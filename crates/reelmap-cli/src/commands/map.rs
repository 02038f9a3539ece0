use anyhow::{bail, Context, Result};
use std::io::{BufRead, Write};
use std::str::FromStr;

use reelmap_core::{FilmQuery, GeoPoint, MapRenderer};
use reelmap_etl::{Config, Geocoder, LeafletRenderer, NominatimGeocoder};

/// Inputs for `reelmap map` that were not folded into the configuration.
#[derive(Debug)]
pub struct MapArgs {
    pub year: Option<i32>,
    pub title: Option<String>,
    pub location: Option<String>,
    pub place: Option<String>,
    pub strict: bool,
    pub json: bool,
}

/// Answer one film query: the film's locations and those nearest to the user.
pub async fn run_map(args: MapArgs, config: &Config) -> Result<()> {
    let index = super::load_index(config, args.strict)?;
    log::info!(
        "Loaded {} locations from {}",
        index.len(),
        config.dataset_path.display()
    );

    let stdin = std::io::stdin();
    let mut input = stdin.lock();

    let year = match args.year {
        Some(year) => year,
        None => prompt(
            &mut input,
            "Please enter a year you would like to have a map for: ",
        )?,
    };

    let origin = match (args.location, args.place) {
        (Some(location), _) => GeoPoint::from_str(&location)
            .with_context(|| format!("Invalid location {location:?}, expected \"lat, lon\""))?,
        (None, Some(place)) => locate_place(&place, config).await?,
        (None, None) => prompt(&mut input, "Please enter your location (format: lat, lon): ")?,
    };

    let title = match args.title {
        Some(title) => title,
        None => prompt::<String, _>(
            &mut input,
            "Please enter the name of the film you would like to have a map for: ",
        )?,
    };

    let query = FilmQuery::new(year, title, origin).with_limit(config.nearest_count);

    if args.json {
        let map = query.resolve(&index)?;
        println!("{}", serde_json::to_string_pretty(&map)?);
        return Ok(());
    }

    println!("Map is generating...");
    println!("Please wait...");
    let renderer = LeafletRenderer::new(config.output_dir.clone());
    let map = query.resolve(&index)?;
    let path = renderer.render(&map)?;

    println!("\n✓ {} location(s) of {:?} ({})", map.film_locations.len(), map.title, map.year);
    println!("  {} nearby filming location(s) from {}", map.nearest.len(), map.year);
    println!("  Finished. Please have a look at the map {}", path.display());

    Ok(())
}

/// Resolve a place name through the configured geocoder.
async fn locate_place(place: &str, config: &Config) -> Result<GeoPoint> {
    let geocoder = NominatimGeocoder::from_config(config).context("Failed to create geocoder")?;
    match geocoder
        .locate(place)
        .await
        .with_context(|| format!("Failed to geocode {place:?}"))?
    {
        Some(point) => {
            println!("  {place} → {point}");
            Ok(point)
        }
        None => bail!("No coordinates found for {place:?}"),
    }
}

/// Ask until the answer parses; end of input is an error.
fn prompt<T, R>(input: &mut R, question: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    R: BufRead,
{
    loop {
        print!("{question}");
        std::io::stdout().flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            bail!("No input given");
        }

        match line.trim().parse() {
            Ok(value) if !line.trim().is_empty() => return Ok(value),
            Ok(_) => println!("  Please enter a value."),
            Err(e) => println!("  Invalid input: {e}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_prompt_retries_until_valid() {
        let mut input = Cursor::new("soon\n\n2011\n");
        let year: i32 = prompt(&mut input, "year? ").unwrap();
        assert_eq!(year, 2011);
    }

    #[test]
    fn test_prompt_parses_location() {
        let mut input = Cursor::new("49.8397, 24.0297\n");
        let point: GeoPoint = prompt(&mut input, "where? ").unwrap();
        assert!((point.latitude() - 49.8397).abs() < 1e-9);
    }

    #[test]
    fn test_prompt_fails_at_end_of_input() {
        let mut input = Cursor::new("");
        assert!(prompt::<i32, _>(&mut input, "year? ").is_err());
    }
}
