use anyhow::{Context, Result};
use catalog::{Catalog, Domain, Entity, Library};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use engine::{Policy, Selection, TagSort};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::path::PathBuf;
use std::time::Instant;

/// CineViz - Catalog query engine for the movies/anime/manga/TV datasets
#[derive(Parser)]
#[command(name = "cineviz")]
#[command(about = "Search, recommend and aggregate over static catalog datasets", long_about = None)]
struct Cli {
    /// Path to the directory holding the *_data.json datasets
    #[arg(short, long, default_value = "data")]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

/// Catalog domain to query
#[derive(Debug, Clone, Copy, ValueEnum)]
enum DomainArg {
    Movies,
    Anime,
    Manga,
    Series,
}

impl From<DomainArg> for Domain {
    fn from(arg: DomainArg) -> Self {
        match arg {
            DomainArg::Movies => Domain::Movies,
            DomainArg::Anime => Domain::Anime,
            DomainArg::Manga => Domain::Manga,
            DomainArg::Series => Domain::Series,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a partial title search to its best match
    Search {
        /// Which catalog to search
        #[arg(long, value_enum)]
        domain: DomainArg,

        /// Search term (case-insensitive substring of the title)
        #[arg(long)]
        term: String,

        /// Number of ranked matches to display
        #[arg(long, default_value = "10")]
        limit: usize,
    },

    /// Recommend an entity based on a resolved search anchor
    Recommend {
        /// Which catalog to search
        #[arg(long, value_enum)]
        domain: DomainArg,

        /// Search term resolving the anchor entity
        #[arg(long)]
        term: String,

        /// Minimum rating a candidate must meet
        #[arg(long, default_value = "8.0")]
        min_rating: f64,

        /// Minimum popularity (members/votes) a candidate must meet
        #[arg(long, default_value = "500000")]
        min_popularity: u64,

        /// Drop the shared-genre requirement
        #[arg(long)]
        no_genre_overlap: bool,

        /// Size of the shortlist the pick is drawn from
        #[arg(long, default_value = "1")]
        top_k: usize,

        /// Pick uniformly at random from the shortlist instead of the top
        #[arg(long)]
        random: bool,

        /// Seed for the random pick (reproducible runs)
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Show genre counts for a catalog
    Genres {
        /// Which catalog to aggregate
        #[arg(long, value_enum)]
        domain: DomainArg,

        /// Sort order for the displayed counts
        #[arg(long, value_enum, default_value = "count")]
        sort: SortArg,

        /// Case-insensitive substring filter on the genre name
        #[arg(long)]
        filter: Option<String>,

        /// Show at most this many genres
        #[arg(long)]
        top: Option<usize>,
    },

    /// List top-rated entities above a popularity floor
    Top {
        /// Which catalog to list
        #[arg(long, value_enum)]
        domain: DomainArg,

        /// Minimum popularity to qualify
        #[arg(long, default_value = "10000")]
        min_popularity: u64,

        /// Number of entities to show
        #[arg(long, default_value = "10")]
        limit: usize,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SortArg {
    Count,
    Alpha,
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    // Load all four datasets up front (this may take a moment)
    println!("Loading catalog datasets from {}...", cli.data_dir.display());
    let start = Instant::now();
    let library = Library::load_from_dir(&cli.data_dir)
        .context("Failed to load catalog datasets")?;
    let (total, skipped) = library.counts();
    println!(
        "{} Loaded {} entities ({} malformed records skipped) in {:?}",
        "✓".green(),
        total,
        skipped,
        start.elapsed()
    );

    // Dispatch to appropriate command handler
    match cli.command {
        Commands::Search {
            domain,
            term,
            limit,
        } => handle_search(library.catalog(domain.into()), &term, limit),
        Commands::Recommend {
            domain,
            term,
            min_rating,
            min_popularity,
            no_genre_overlap,
            top_k,
            random,
            seed,
        } => {
            let policy = Policy {
                min_rating,
                min_popularity,
                require_genre_overlap: !no_genre_overlap,
                top_k,
                selection: if random {
                    Selection::Random
                } else {
                    Selection::Best
                },
            };
            handle_recommend(library.catalog(domain.into()), &term, &policy, seed)
        }
        Commands::Genres {
            domain,
            sort,
            filter,
            top,
        } => handle_genres(library.catalog(domain.into()), sort, filter.as_deref(), top),
        Commands::Top {
            domain,
            min_popularity,
            limit,
        } => handle_top(library.catalog(domain.into()), min_popularity, limit),
    }
}

/// Handle the 'search' command
fn handle_search(catalog: &Catalog, term: &str, limit: usize) -> Result<()> {
    let ranked = engine::matches(catalog.entities(), term);

    if ranked.is_empty() {
        // A miss is an ordinary outcome, not an error
        println!(
            "{}",
            format!("No {} found matching \"{}\".", catalog.domain(), term).italic()
        );
        return Ok(());
    }

    println!(
        "{}",
        format!("Search results for \"{}\":", term).bold().blue()
    );
    for (rank, entity) in ranked.iter().take(limit).enumerate() {
        if rank == 0 {
            println!("{} {}", "★".yellow(), format_entity(entity).bold());
        } else {
            println!("  {}", format_entity(entity));
        }
    }
    Ok(())
}

/// Handle the 'recommend' command
fn handle_recommend(
    catalog: &Catalog,
    term: &str,
    policy: &Policy,
    seed: Option<u64>,
) -> Result<()> {
    let Some(anchor) = engine::resolve(catalog.entities(), term) else {
        println!(
            "{}",
            format!("No {} found matching \"{}\".", catalog.domain(), term).italic()
        );
        return Ok(());
    };

    println!("{} {}", "Anchor:".bold().blue(), format_entity(anchor));

    let shortlist = engine::shortlist(catalog.entities(), anchor, policy)
        .context("Invalid recommendation policy")?;

    if shortlist.is_empty() {
        println!("{}", "No recommendation available.".italic());
        return Ok(());
    }

    println!("{}", "Shortlist:".bold().blue());
    for (rank, entity) in shortlist.iter().enumerate() {
        println!("  {}. {}", rank + 1, format_entity(entity));
    }

    let pick = match seed {
        Some(seed) => {
            let mut rng = StdRng::seed_from_u64(seed);
            engine::recommend_with(catalog.entities(), anchor, policy, &mut rng)
        }
        None => engine::recommend(catalog.entities(), anchor, policy),
    }?;

    // Shortlist was non-empty, so a pick always exists here
    if let Some(pick) = pick {
        println!(
            "{} {}",
            "You should watch:".bold().green(),
            pick.title.bold()
        );
    }
    Ok(())
}

/// Handle the 'genres' command
fn handle_genres(
    catalog: &Catalog,
    sort: SortArg,
    filter: Option<&str>,
    top: Option<usize>,
) -> Result<()> {
    let counts = engine::tag_counts(catalog.entities(), |e| e.genres.as_slice());
    let sort = match sort {
        SortArg::Count => TagSort::CountDesc,
        SortArg::Alpha => TagSort::Alphabetical,
    };
    let displayed = engine::present(&counts, sort, filter, top);

    if displayed.is_empty() {
        println!("{}", "No genres to display.".italic());
        return Ok(());
    }

    println!(
        "{}",
        format!("Genre distribution ({}):", catalog.domain()).bold().blue()
    );
    for (genre, count) in displayed {
        println!("  {:<20} {}", genre, count.to_string().cyan());
    }
    Ok(())
}

/// Handle the 'top' command
fn handle_top(catalog: &Catalog, min_popularity: u64, limit: usize) -> Result<()> {
    let top = engine::top_rated(catalog.entities(), min_popularity, limit);

    if top.is_empty() {
        println!("{}", "No entities above the popularity floor.".italic());
        return Ok(());
    }

    println!(
        "{}",
        format!(
            "Top {} {} by rating (popularity >= {}):",
            top.len(),
            catalog.domain(),
            min_popularity
        )
        .bold()
        .blue()
    );
    for (rank, entity) in top.iter().enumerate() {
        println!(
            "{}. {}",
            (rank + 1).to_string().green(),
            format_entity(entity)
        );
    }
    Ok(())
}

/// One-line display form of an entity
fn format_entity(entity: &Entity) -> String {
    let genres = if entity.genres.is_empty() {
        "N/A".to_string()
    } else {
        entity.genres.join(", ")
    };
    format!(
        "{} [{}] - rating {:.2}, popularity {}",
        entity.title, genres, entity.rating, entity.popularity
    )
}
