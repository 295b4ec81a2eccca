// Inline style parsing
//
// Only the properties the layout and visibility model needs are understood.
// There are no stylesheets: whatever is not in a `style` attribute does not
// exist.

/// Positioning scheme of an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Positioning {
    /// Participates in block flow
    #[default]
    Static,
    /// Participates in block flow, may carry a z-index
    Relative,
    /// Removed from flow, placed with left/top
    Absolute,
    /// Removed from flow, placed with left/top relative to the viewport
    Fixed,
}

impl Positioning {
    /// Whether the element is taken out of block flow.
    pub fn is_out_of_flow(self) -> bool {
        matches!(self, Positioning::Absolute | Positioning::Fixed)
    }
}

/// The subset of an inline style that influences layout and hit testing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InlineStyle {
    pub display_none: bool,
    /// `Some(true)` for `visibility: hidden`, `Some(false)` for `visible`
    pub visibility_hidden: Option<bool>,
    /// `Some(true)` for `pointer-events: none`, `Some(false)` for `auto`
    pub pointer_events_none: Option<bool>,
    pub position: Positioning,
    pub left: Option<f64>,
    pub top: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub z_index: Option<i32>,
}

impl InlineStyle {
    /// Parses a `style` attribute value. Unknown properties are ignored.
    pub fn parse(style: &str) -> Self {
        let mut parsed = InlineStyle::default();
        for declaration in style.split(';') {
            let Some((name, value)) = declaration.split_once(':') else {
                continue;
            };
            let name = name.trim().to_ascii_lowercase();
            let value = value.trim().trim_end_matches("!important").trim();
            match name.as_str() {
                "display" => parsed.display_none = value.eq_ignore_ascii_case("none"),
                "visibility" => {
                    parsed.visibility_hidden = Some(
                        value.eq_ignore_ascii_case("hidden")
                            || value.eq_ignore_ascii_case("collapse"),
                    )
                }
                "pointer-events" => {
                    parsed.pointer_events_none = Some(value.eq_ignore_ascii_case("none"))
                }
                "position" => {
                    parsed.position = match value.to_ascii_lowercase().as_str() {
                        "relative" => Positioning::Relative,
                        "absolute" => Positioning::Absolute,
                        "fixed" => Positioning::Fixed,
                        _ => Positioning::Static,
                    }
                }
                "left" => parsed.left = parse_length(value),
                "top" => parsed.top = parse_length(value),
                "width" => parsed.width = parse_length(value),
                "height" => parsed.height = parse_length(value),
                "z-index" => parsed.z_index = value.parse().ok(),
                _ => {}
            }
        }
        parsed
    }
}

/// Parses `12px`, `12` or `12.5px`. Percentages and keywords are not lengths here.
fn parse_length(value: &str) -> Option<f64> {
    let number = value.strip_suffix("px").unwrap_or(value).trim();
    number.parse::<f64>().ok().filter(|n| n.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_overlay_style() {
        let style = InlineStyle::parse(
            "position: fixed; left: 0; top: 0px; width: 1280px; height:720px; z-index: 10",
        );
        assert_eq!(style.position, Positioning::Fixed);
        assert_eq!(style.left, Some(0.0));
        assert_eq!(style.width, Some(1280.0));
        assert_eq!(style.height, Some(720.0));
        assert_eq!(style.z_index, Some(10));
        assert!(!style.display_none);
    }

    #[test]
    fn test_parse_visibility_flags() {
        let style = InlineStyle::parse("display:none; visibility:hidden; pointer-events: none");
        assert!(style.display_none);
        assert_eq!(style.visibility_hidden, Some(true));
        assert_eq!(style.pointer_events_none, Some(true));
        assert_eq!(InlineStyle::parse("width: auto").width, None);
    }
}
