//! `-v`/`-q` counting flags mapped onto a tracing level filter.

use tracing::{level_filters::LevelFilter, Level};

const DEFAULT: i8 = 2;

#[derive(clap::Args, Debug, Clone)]
pub struct Verbosity {
    /// More output per occurrence
    #[clap(long, short = 'v', parse(from_occurrences), global = true)]
    verbose: i8,

    /// Less output per occurrence
    #[clap(
        long,
        short = 'q',
        parse(from_occurrences),
        global = true,
        conflicts_with = "verbose"
    )]
    quiet: i8,
}

impl Verbosity {
    /// Info by default; each `-v` or `-q` moves one level.
    pub fn log_level_filter(&self) -> LevelFilter {
        level(DEFAULT.saturating_sub(self.quiet).saturating_add(self.verbose))
            .map(LevelFilter::from_level)
            .unwrap_or(LevelFilter::OFF)
    }
}

fn level(verbosity: i8) -> Option<Level> {
    match verbosity {
        i8::MIN..=-1 => None,
        0 => Some(Level::ERROR),
        1 => Some(Level::WARN),
        2 => Some(Level::INFO),
        3 => Some(Level::DEBUG),
        4..=i8::MAX => Some(Level::TRACE),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn verbosity(verbose: i8, quiet: i8) -> Verbosity {
        Verbosity { verbose, quiet }
    }

    #[test]
    fn defaults_to_info() {
        assert_eq!(verbosity(0, 0).log_level_filter(), LevelFilter::INFO);
    }

    #[test]
    fn flags_shift_the_level() {
        assert_eq!(verbosity(1, 0).log_level_filter(), LevelFilter::DEBUG);
        assert_eq!(verbosity(5, 0).log_level_filter(), LevelFilter::TRACE);
        assert_eq!(verbosity(0, 2).log_level_filter(), LevelFilter::ERROR);
        assert_eq!(verbosity(0, 3).log_level_filter(), LevelFilter::OFF);
    }

    #[test]
    fn many_flags_saturate() {
        assert_eq!(verbosity(i8::MAX, 0).log_level_filter(), LevelFilter::TRACE);
        assert_eq!(verbosity(0, i8::MAX).log_level_filter(), LevelFilter::OFF);
    }
}
