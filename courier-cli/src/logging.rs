//! Logger initialisation for the CLI.

use std::io::{self, Write};

use env_logger::{Builder, Target, WriteStyle};
use log::LevelFilter;

/// Level used when neither configuration nor flags choose one.
pub(crate) const DEFAULT_LOG_LEVEL: LevelFilter = LevelFilter::Warn;

/// Install a stderr logger filtered at `level`.
///
/// `RUST_LOG` directives still refine the filter per module.
pub(crate) fn init(level: LevelFilter) -> io::Result<()> {
    let mut builder = Builder::new();
    builder
        .filter_level(level)
        .parse_default_env()
        .write_style(WriteStyle::Never)
        .target(Target::Stderr)
        .format(|buf, record| {
            writeln!(
                buf,
                "{} [{}] {}",
                record.level(),
                record.target(),
                record.args()
            )
        });
    builder.try_init().map_err(io::Error::other)
}
