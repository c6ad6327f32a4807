//! Handler skeleton substitution.
//!
//! Skeletons are plain text with `$name$` placeholders. A line holding only
//! `$if name$` opens an optional section that is kept when `name` has a value
//! and dropped entirely otherwise; a line holding only `$end$` closes it.
//! `$$` is a literal `$`.
//!
//! Placeholder names are checked when the skeleton is parsed, so a typo fails
//! before any handler is rendered.

use crate::error::TemplateError;
use crate::synth::HandlerParams;

/// Handler skeleton used unless the config overrides it.
pub const HANDLER_TEMPLATE: &str = r#"/// `$target_type$` handler for `Role::$role$`.
pub struct $handler_name$;

impl RoleHandler for $handler_name$ {
    type Node = $target_type$;

    const ROLE: Role = Role::$role$;
    const VALUE_TYPE: &'static str = "$value_type$";

    fn get_value(&self, node: &Self::Node) -> FieldValue {
        node.$getter_name$().into()
    }
$if setter_name$

    fn set_value(&self, node: &mut Self::Node, value: FieldValue) -> Result<(), AccessError> {
        node.$setter_name$(value.try_into()?);
        Ok(())
    }
$end$
}

impl $handler_family$ for $handler_name$ {}
"#;

/// Substitution parameter of a handler skeleton.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Param {
    HandlerName,
    GetterName,
    SetterName,
    Role,
    TargetType,
    HandlerFamily,
    ValueType,
}

impl Param {
    pub const ALL: [Param; 7] = [
        Self::HandlerName,
        Self::GetterName,
        Self::SetterName,
        Self::Role,
        Self::TargetType,
        Self::HandlerFamily,
        Self::ValueType,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::HandlerName => "handler_name",
            Self::GetterName => "getter_name",
            Self::SetterName => "setter_name",
            Self::Role => "role",
            Self::TargetType => "target_type",
            Self::HandlerFamily => "handler_family",
            Self::ValueType => "value_type",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.name() == name)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum Segment {
    Text(String),
    Param(Param),
    Section { param: Param, body: Vec<Segment> },
}

/// Parsed skeleton.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Template {
    segments: Vec<Segment>,
}

impl Template {
    pub fn parse(text: &str) -> Result<Self, TemplateError> {
        // Stack of open sections: (param, opening line, segments so far).
        let mut open: Vec<(Param, usize, Vec<Segment>)> = Vec::new();
        let mut segments = Vec::new();

        for (i, line) in text.split_inclusive('\n').enumerate() {
            let line_no = i + 1;
            let directive = line.trim();

            if directive == "$end$" {
                let Some((param, _, body)) = open.pop() else {
                    return Err(TemplateError::UnmatchedEnd(line_no));
                };
                let section = Segment::Section { param, body };
                match open.last_mut() {
                    Some((_, _, parent)) => parent.push(section),
                    None => segments.push(section),
                }
                continue;
            }

            if let Some(name) = directive
                .strip_prefix("$if ")
                .and_then(|rest| rest.strip_suffix('$'))
            {
                let name = name.trim();
                let param = Param::from_name(name)
                    .ok_or_else(|| TemplateError::UnknownPlaceholder(name.to_string(), line_no))?;
                open.push((param, line_no, Vec::new()));
                continue;
            }

            let current = match open.last_mut() {
                Some((_, _, body)) => body,
                None => &mut segments,
            };
            parse_line(line, line_no, current)?;
        }

        if let Some((param, line_no, _)) = open.pop() {
            return Err(TemplateError::UnclosedSection(
                param.name().to_string(),
                line_no,
            ));
        }

        Ok(Self { segments })
    }

    /// Placeholders referenced anywhere in the skeleton, in first-use order.
    pub fn params(&self) -> Vec<Param> {
        fn walk(segments: &[Segment], out: &mut Vec<Param>) {
            for seg in segments {
                match seg {
                    Segment::Text(_) => {}
                    Segment::Param(p) => {
                        if !out.contains(p) {
                            out.push(*p);
                        }
                    }
                    Segment::Section { param, body } => {
                        if !out.contains(param) {
                            out.push(*param);
                        }
                        walk(body, out);
                    }
                }
            }
        }

        let mut out = Vec::new();
        walk(&self.segments, &mut out);
        out
    }

    pub fn render(&self, params: &HandlerParams) -> Result<String, TemplateError> {
        let mut out = String::new();
        render_segments(&self.segments, params, &mut out)?;
        Ok(out)
    }
}

fn parse_line(line: &str, line_no: usize, out: &mut Vec<Segment>) -> Result<(), TemplateError> {
    let mut text = String::new();
    let mut rest = line;

    while let Some(start) = rest.find('$') {
        text.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        let Some(end) = after.find('$') else {
            return Err(TemplateError::UnterminatedPlaceholder(line_no));
        };
        let name = &after[..end];
        if name.is_empty() {
            text.push('$');
        } else {
            let param = Param::from_name(name)
                .ok_or_else(|| TemplateError::UnknownPlaceholder(name.to_string(), line_no))?;
            if !text.is_empty() {
                out.push(Segment::Text(std::mem::take(&mut text)));
            }
            out.push(Segment::Param(param));
        }
        rest = &after[end + 1..];
    }

    text.push_str(rest);
    if !text.is_empty() {
        out.push(Segment::Text(text));
    }
    Ok(())
}

fn render_segments(
    segments: &[Segment],
    params: &HandlerParams,
    out: &mut String,
) -> Result<(), TemplateError> {
    for seg in segments {
        match seg {
            Segment::Text(text) => out.push_str(text),
            Segment::Param(param) => {
                let value = params
                    .get(*param)
                    .ok_or(TemplateError::MissingParameter(param.name()))?;
                out.push_str(value);
            }
            Segment::Section { param, body } => {
                if params.get(*param).is_some() {
                    render_segments(body, params, out)?;
                }
            }
        }
    }
    Ok(())
}
