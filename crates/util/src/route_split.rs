//! Route template tokenizing and path building.

use routegen_types::ParameterDescriptor;

#[derive(Debug, Clone, Eq, PartialEq)]
enum Segment {
    Literal(String),
    Param(usize),
}

/// A route template split into literal segments and ordered parameters.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct RouteSplit {
    /// Parameters in left-to-right order.
    pub params: Vec<ParameterDescriptor>,
    segments: Vec<Segment>,
}

impl RouteSplit {
    /// Build a concrete path by substituting `values` for the parameters in order.
    ///
    /// Parameters without a corresponding value keep their `:name` segment.
    pub fn create_path<S: AsRef<str>>(&self, values: &[S]) -> String {
        self.segments
            .iter()
            .map(|segment| match segment {
                Segment::Literal(text) => text.clone(),
                Segment::Param(position) => match values.get(*position) {
                    Some(value) => value.as_ref().to_string(),
                    None => format!(":{}", self.params[*position].name),
                },
            })
            .collect::<Vec<_>>()
            .join("/")
    }
}

/// Split `/blog/:category/:slug` into its parameters and a path builder.
///
/// # Examples
/// ```rust
/// use routegen_util::route_split;
///
/// let split = route_split("/blog/:category/:slug");
/// assert_eq!(split.params[1].name, "slug");
/// assert_eq!(split.create_path(&["tech", "hello"]), "/blog/tech/hello");
/// ```
pub fn route_split(route_template: &str) -> RouteSplit {
    let mut params = Vec::new();
    let segments = route_template
        .split('/')
        .map(|part| match part.strip_prefix(':') {
            Some(name) if !name.is_empty() => {
                let position = params.len();
                params.push(ParameterDescriptor::new(name, position));
                Segment::Param(position)
            }
            _ => Segment::Literal(part.to_string()),
        })
        .collect();
    RouteSplit { params, segments }
}
