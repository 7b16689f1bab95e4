// Console logging and small CSS helpers
use log::{Level, LevelFilter};

pub const EASE: &str = "cubic-bezier(0.4, 0, 0.2, 1)";

pub fn translate_x(offset: f64) -> String {
    if offset == 0.0 {
        return String::new();
    }
    format!("translateX({}px)", -offset)
}

pub fn reset_transition(ms: i32) -> String {
    format!("transform {}s {}", seconds(ms), EASE)
}

pub fn delete_transition(ms: i32) -> String {
    let s = seconds(ms);
    format!("transform {s}s {EASE}, opacity {s}s ease")
}

fn seconds(ms: i32) -> f64 {
    f64::from(ms.max(0)) / 1000.0
}

/// Route `log` output to the browser console. `level` is the initial ceiling;
/// the page config may change it later through `log::set_max_level`.
pub fn init_logging(level: LevelFilter) {
    wasm_logger::init(wasm_logger::Config::new(Level::Trace));
    log::set_max_level(level);
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn translation_moves_left() {
        assert_eq!(translate_x(80.0), "translateX(-80px)");
        assert_eq!(translate_x(60.5), "translateX(-60.5px)");
        assert_eq!(translate_x(0.0), "");
    }

    #[test]
    fn transitions() {
        assert_eq!(
            reset_transition(300),
            "transform 0.3s cubic-bezier(0.4, 0, 0.2, 1)"
        );
        assert_eq!(
            delete_transition(300),
            "transform 0.3s cubic-bezier(0.4, 0, 0.2, 1), opacity 0.3s ease"
        );
    }
}
