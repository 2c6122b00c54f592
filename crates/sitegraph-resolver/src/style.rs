//! Style descriptor to utility class mapping.
//!
//! A style descriptor maps style properties (`alignItems`, `margin`, ...)
//! to enumerated tokens or spacing values. Known properties are looked up
//! in fixed tables; unknown properties pass their value through so authors
//! can put raw utility classes in content.

use serde_json::{Map, Value};
use tracing::warn;

/// Unit the spacing scale is measured in: a magnitude of 8 is step 2.
const SPACING_UNIT: f64 = 4.0;

type Table = &'static [(&'static str, &'static str)];

const ALIGN_ITEMS: Table = &[
    ("flex-start", "items-start"),
    ("flex-end", "items-end"),
    ("center", "items-center"),
];

const BACKGROUND_POSITION: Table = &[
    ("bottom", "bg-bottom"),
    ("center", "bg-center"),
    ("left", "bg-left"),
    ("left-bottom", "bg-left-bottom"),
    ("left-top", "bg-left-top"),
    ("right", "bg-right"),
    ("right-bottom", "bg-right-bottom"),
    ("right-top", "bg-right-top"),
    ("top", "bg-top"),
];

const BACKGROUND_REPEAT: Table = &[
    ("repeat", "bg-repeat"),
    ("repeat-x", "bg-repeat-x"),
    ("repeat-y", "bg-repeat-y"),
    ("no-repeat", "bg-no-repeat"),
];

const BACKGROUND_SIZE: Table = &[
    ("auto", "bg-auto"),
    ("cover", "bg-cover"),
    ("contain", "bg-contain"),
];

const BORDER_RADIUS: Table = &[
    ("none", "rounded-none"),
    ("xx-small", "rounded-sm"),
    ("x-small", "rounded"),
    ("small", "rounded-md"),
    ("medium", "rounded-lg"),
    ("large", "rounded-xl"),
    ("x-large", "rounded-2xl"),
    ("xx-large", "rounded-3xl"),
    ("full", "rounded-full"),
];

const BORDER_STYLE: Table = &[
    ("none", "border-none"),
    ("solid", "border-solid"),
    ("dashed", "border-dashed"),
    ("dotted", "border-dotted"),
    ("double", "border-double"),
];

const BORDER_WIDTH: Table = &[
    ("0", "border-0"),
    ("1", "border"),
    ("2", "border-2"),
    ("4", "border-4"),
    ("8", "border-8"),
];

const BOX_SHADOW: Table = &[
    ("none", "shadow-none"),
    ("x-small", "shadow-sm"),
    ("small", "shadow"),
    ("medium", "shadow-md"),
    ("large", "shadow-lg"),
    ("x-large", "shadow-xl"),
    ("xx-large", "shadow-2xl"),
    ("inner", "shadow-inner"),
];

const FONT_SIZE: Table = &[
    ("x-small", "text-xs"),
    ("small", "text-sm"),
    ("medium", "text-base"),
    ("large", "text-lg"),
    ("x-large", "text-xl"),
    ("xx-large", "text-2xl"),
    ("xxx-large", "text-3xl"),
];

const FONT_STYLE: Table = &[("italic", "italic")];

const FONT_WEIGHT: Table = &[
    ("100", "font-thin"),
    ("200", "font-extralight"),
    ("300", "font-light"),
    ("400", "font-normal"),
    ("500", "font-medium"),
    ("600", "font-semibold"),
    ("700", "font-bold"),
    ("800", "font-extrabold"),
];

const JUSTIFY_CONTENT: Table = &[
    ("flex-start", "justify-start"),
    ("flex-end", "justify-end"),
    ("center", "justify-center"),
];

const TEXT_ALIGN: Table = &[
    ("left", "text-left"),
    ("center", "text-center"),
    ("right", "text-right"),
    ("justify", "text-justify"),
];

const TEXT_DECORATION: Table = &[
    ("underline", "underline"),
    ("line-through", "line-through"),
    ("underline line-through", "underline-line-through"),
];

/// Spacing properties converted by rule rather than by table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Spacing {
    Margin,
    Padding,
}

impl Spacing {
    fn name(self) -> &'static str {
        match self {
            Self::Margin => "margin",
            Self::Padding => "padding",
        }
    }

    fn prefix(self) -> char {
        match self {
            Self::Margin => 'm',
            Self::Padding => 'p',
        }
    }

    /// Convert a spacing value.
    ///
    /// Arrays hold ready-made classes (`["mt-0", "mb-4"]`); direction
    /// mappings hold pixel magnitudes (`{"top": 8}` becomes `mt-2`).
    fn class_names(self, value: &Value) -> String {
        match value {
            Value::Array(items) => items
                .iter()
                .filter_map(token_of)
                .collect::<Vec<_>>()
                .join(" "),
            Value::Object(directions) => directions
                .iter()
                .filter_map(|(direction, magnitude)| {
                    let side = match direction.as_str() {
                        "top" => 't',
                        "bottom" => 'b',
                        "left" => 'l',
                        "right" => 'r',
                        _ => return None,
                    };
                    let Some(step) = spacing_step(magnitude) else {
                        warn!(
                            property = self.name(),
                            direction = %direction,
                            value = %magnitude,
                            "non-numeric spacing magnitude"
                        );
                        return None;
                    };
                    Some(format!("{}{side}-{step}", self.prefix()))
                })
                .collect::<Vec<_>>()
                .join(" "),
            _ => {
                warn!(
                    property = self.name(),
                    value = %value,
                    "cannot convert style field value to class name"
                );
                String::new()
            }
        }
    }
}

enum Rule {
    Table(Table),
    Spacing(Spacing),
}

fn rule_for(property: &str) -> Option<Rule> {
    let table = match property {
        "alignItems" => ALIGN_ITEMS,
        "backgroundPosition" => BACKGROUND_POSITION,
        "backgroundRepeat" => BACKGROUND_REPEAT,
        "backgroundSize" => BACKGROUND_SIZE,
        "borderRadius" => BORDER_RADIUS,
        "borderStyle" => BORDER_STYLE,
        "borderWidth" => BORDER_WIDTH,
        "boxShadow" => BOX_SHADOW,
        "fontSize" => FONT_SIZE,
        "fontStyle" => FONT_STYLE,
        "fontWeight" => FONT_WEIGHT,
        "justifyContent" => JUSTIFY_CONTENT,
        "textAlign" => TEXT_ALIGN,
        "textDecoration" => TEXT_DECORATION,
        "margin" => return Some(Rule::Spacing(Spacing::Margin)),
        "padding" => return Some(Rule::Spacing(Spacing::Padding)),
        _ => return None,
    };
    Some(Rule::Table(table))
}

/// Map a style descriptor to a space-separated class list.
///
/// Classes come out in descriptor order. Never fails: values that cannot
/// be converted contribute nothing.
pub fn map_styles(styles: &Map<String, Value>) -> String {
    let mut classes = Vec::with_capacity(styles.len());

    for (property, value) in styles {
        let contributed = match rule_for(property) {
            Some(Rule::Table(table)) => token_of(value).and_then(|key| {
                table
                    .iter()
                    .find(|(k, _)| *k == key)
                    .map(|(_, class)| (*class).to_string())
            }),
            Some(Rule::Spacing(spacing)) => Some(spacing.class_names(value)),
            None => passthrough(property, value),
        };

        if let Some(class) = contributed.filter(|c| !c.is_empty()) {
            classes.push(class);
        }
    }

    classes.join(" ")
}

/// Map any JSON value holding a descriptor; non-objects yield no classes.
pub fn class_names(styles: &Value) -> String {
    styles.as_object().map(map_styles).unwrap_or_default()
}

/// Merge descriptors, later ones overriding earlier properties.
pub fn combine_styles<'a>(
    descriptors: impl IntoIterator<Item = Option<&'a Map<String, Value>>>,
) -> Map<String, Value> {
    let mut combined = Map::new();
    for descriptor in descriptors.into_iter().flatten() {
        for (property, value) in descriptor {
            combined.insert(property.clone(), value.clone());
        }
    }
    combined
}

fn passthrough(property: &str, value: &Value) -> Option<String> {
    match value {
        Value::Array(items) => Some(
            items
                .iter()
                .filter_map(token_of)
                .collect::<Vec<_>>()
                .join(" "),
        ),
        Value::Object(_) => {
            warn!(property, "cannot pass structured style value through as a class");
            None
        }
        other => token_of(other),
    }
}

/// String form of a scalar, matching how authors write table keys.
fn token_of(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => n.as_f64().map(format_number),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn spacing_step(magnitude: &Value) -> Option<String> {
    if magnitude.as_f64() == Some(1.0) {
        return Some("px".to_string());
    }
    let number = match magnitude {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    Some(format_number(number / SPACING_UNIT))
}

fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{n}")
    }
}
