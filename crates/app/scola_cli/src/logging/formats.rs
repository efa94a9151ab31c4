use flexi_logger::DeferredNow;
use log::{Level, Record};

/// `LEVEL message`, with the module path only below `Info`.
pub fn cli_format(
    w: &mut dyn std::io::Write,
    _now: &mut DeferredNow,
    record: &Record,
) -> Result<(), std::io::Error> {
    match record.level() {
        Level::Error | Level::Warn | Level::Info => {
            write!(w, "{:<5} {}", record.level(), record.args())
        }
        _ => write!(
            w,
            "{:<5} [{}] {}",
            record.level(),
            record.module_path().unwrap_or("<unknown>"),
            record.args()
        ),
    }
}
