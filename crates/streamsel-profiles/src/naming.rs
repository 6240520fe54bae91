//! Parameter-name derivation.

/// Substitute `stream_name` for the first `%s` in `template`.
///
/// `parameter_name("enable_%s", "depth") == "enable_depth"` and
/// `parameter_name("%s_fps", "gyro") == "gyro_fps"`.  A template without a
/// placeholder is returned unchanged.
pub fn parameter_name(template: &str, stream_name: &str) -> String {
    template.replacen("%s", stream_name, 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enable_template() {
        assert_eq!(parameter_name("enable_%s", "Depth"), "enable_Depth");
        assert_eq!(parameter_name("enable_%s", "infra1"), "enable_infra1");
    }

    #[test]
    fn fps_template() {
        assert_eq!(parameter_name("%s_fps", "gyro"), "gyro_fps");
    }

    #[test]
    fn only_first_placeholder_is_replaced() {
        assert_eq!(parameter_name("%s.%s", "accel"), "accel.%s");
    }

    #[test]
    fn template_without_placeholder_is_unchanged() {
        assert_eq!(parameter_name("enable", "depth"), "enable");
    }

    #[test]
    fn long_stream_names_are_not_truncated() {
        let name = "a".repeat(256);
        assert_eq!(parameter_name("enable_%s", &name).len(), "enable_".len() + 256);
    }
}
