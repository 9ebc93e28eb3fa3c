// Console colouring helpers
//
// ANSI-coloured messages for the deployment transcript. Every helper prefixes
// the message with a newline and pads it with a single space on each side.

const GREEN: u8 = 92;
const YELLOW: u8 = 93;
const RED: u8 = 91;
const RESET: &str = "\x1b[0m";

fn paint(code: u8, message: &str) -> String {
    format!("\n\x1b[{}m {} {}", code, message, RESET)
}

/// Format a message as a green success line
pub fn green_success(message: &str) -> String {
    paint(GREEN, message)
}

/// Format a message as a yellow warning line
pub fn yellow_warning(message: &str) -> String {
    paint(YELLOW, message)
}

/// Format a message as a red critical line
pub fn red_critical(message: &str) -> String {
    paint(RED, message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_codes() {
        assert_eq!(green_success("ok"), "\n\x1b[92m ok \x1b[0m");
        assert_eq!(yellow_warning("careful"), "\n\x1b[93m careful \x1b[0m");
        assert_eq!(red_critical("broken"), "\n\x1b[91m broken \x1b[0m");
    }
}
