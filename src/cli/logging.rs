//! Logger setup

use log::LevelFilter;

use crate::cli::GlobalOpts;

/// Install the stderr logger.
///
/// `-q`/`-v` pick the base level; `RUST_LOG` directives are applied on top.
pub fn init(global: &GlobalOpts) {
    let mut builder = pretty_env_logger::formatted_builder();
    builder.filter_level(level_for(global));

    if let Ok(filters) = std::env::var("RUST_LOG") {
        builder.parse_filters(&filters);
    }

    // A logger may already be installed when embedded in tests
    let _ = builder.try_init();
}

fn level_for(global: &GlobalOpts) -> LevelFilter {
    if global.verbose {
        LevelFilter::Debug
    } else if global.quiet {
        LevelFilter::Error
    } else {
        LevelFilter::Warn
    }
}
