//! A small text template language for article prompts.
//!
//! Templates are plain text with actions between `{{` and `}}`:
//!
//! ```text
//! Write a {{.Length}} article about {{.Topic}}.
//! {{if .IncludeCode}}Include code examples.{{else}}Prose only.{{end}}
//! {{range .PreviousTitles}}- {{.}}
//! {{end}}
//! ```
//!
//! Fields are resolved against a [`PromptContext`]. `{{.}}` is the current
//! element inside a `range` block. Syntax problems are reported by
//! [`Template::parse`]; unknown fields are reported by [`Template::render`].

use crate::models::PromptContext;
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

static ACTION_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)\{\{(.*?)\}\}").unwrap());
static FIELD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\.([A-Za-z_][A-Za-z0-9_]*)$").unwrap());

#[derive(Debug, Error, PartialEq)]
pub enum TemplateError {
    #[error("template parse error: {0}")]
    Parse(String),

    #[error("template render error: {0}")]
    Render(String),
}

#[derive(Debug, Clone, PartialEq)]
enum Node {
    Text(String),
    Field(String),
    Dot,
    If {
        field: String,
        then: Vec<Node>,
        otherwise: Vec<Node>,
    },
    Range {
        field: String,
        body: Vec<Node>,
    },
}

enum Block {
    If(String),
    Range(String),
}

#[derive(Default)]
struct Frame {
    body: Vec<Node>,
    otherwise: Option<Vec<Node>>,
}

impl Frame {
    fn push(&mut self, node: Node) {
        match &mut self.otherwise {
            Some(nodes) => nodes.push(node),
            None => self.body.push(node),
        }
    }
}

/// Top-level nodes plus the stack of currently open `if`/`range` blocks.
#[derive(Default)]
struct Builder {
    root: Frame,
    open: Vec<(Block, Frame)>,
}

impl Builder {
    fn current(&mut self) -> &mut Frame {
        match self.open.last_mut() {
            Some((_, frame)) => frame,
            None => &mut self.root,
        }
    }

    fn text(&mut self, text: &str) -> Result<(), TemplateError> {
        if text.contains("{{") {
            return Err(TemplateError::Parse("unclosed action".to_string()));
        }
        if !text.is_empty() {
            self.current().push(Node::Text(text.to_string()));
        }
        Ok(())
    }

    fn action(&mut self, action: &str) -> Result<(), TemplateError> {
        match action {
            "." => self.current().push(Node::Dot),
            "else" => match self.open.last_mut() {
                Some((Block::If(_), frame)) if frame.otherwise.is_none() => {
                    frame.otherwise = Some(Vec::new());
                }
                _ => return Err(TemplateError::Parse("unexpected {{else}}".to_string())),
            },
            "end" => {
                let Some((block, frame)) = self.open.pop() else {
                    return Err(TemplateError::Parse("unexpected {{end}}".to_string()));
                };
                let node = match block {
                    Block::If(field) => Node::If {
                        field,
                        then: frame.body,
                        otherwise: frame.otherwise.unwrap_or_default(),
                    },
                    Block::Range(field) => Node::Range {
                        field,
                        body: frame.body,
                    },
                };
                self.current().push(node);
            }
            _ => {
                if let Some(rest) = action.strip_prefix("if ") {
                    let field = field_name(rest).ok_or_else(|| {
                        TemplateError::Parse(format!("bad if condition {rest:?}"))
                    })?;
                    self.open.push((Block::If(field), Frame::default()));
                } else if let Some(rest) = action.strip_prefix("range ") {
                    let field = field_name(rest).ok_or_else(|| {
                        TemplateError::Parse(format!("bad range target {rest:?}"))
                    })?;
                    self.open.push((Block::Range(field), Frame::default()));
                } else if let Some(field) = field_name(action) {
                    self.current().push(Node::Field(field));
                } else {
                    return Err(TemplateError::Parse(format!(
                        "unknown action {{{{{action}}}}}"
                    )));
                }
            }
        }
        Ok(())
    }

    fn finish(self) -> Result<Vec<Node>, TemplateError> {
        if !self.open.is_empty() {
            return Err(TemplateError::Parse(
                "unclosed block: missing {{end}}".to_string(),
            ));
        }
        Ok(self.root.body)
    }
}

/// A parsed template, ready to render.
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    nodes: Vec<Node>,
}

enum Value<'a> {
    Str(&'a str),
    Bool(bool),
    List(&'a [String]),
}

impl Value<'_> {
    fn truthy(&self) -> bool {
        match self {
            Value::Str(s) => !s.is_empty(),
            Value::Bool(b) => *b,
            Value::List(items) => !items.is_empty(),
        }
    }
}

fn lookup<'a>(ctx: &'a PromptContext, field: &str) -> Result<Value<'a>, TemplateError> {
    Ok(match field {
        "Topic" => Value::Str(&ctx.topic),
        "TopicDescription" => Value::Str(&ctx.topic_description),
        "Keywords" => Value::Str(&ctx.keywords),
        "Tone" => Value::Str(&ctx.tone),
        "Length" => Value::Str(&ctx.length),
        "TargetAudience" => Value::Str(&ctx.target_audience),
        "IncludeCode" => Value::Bool(ctx.include_code),
        "PreviousTitles" => Value::List(&ctx.previous_titles),
        other => {
            return Err(TemplateError::Render(format!("unknown field .{other}")));
        }
    })
}

fn field_name(expr: &str) -> Option<String> {
    FIELD_RE
        .captures(expr.trim())
        .map(|caps| caps[1].to_string())
}

impl Template {
    /// Parse template source into a tree of text, fields and blocks.
    pub fn parse(source: &str) -> Result<Self, TemplateError> {
        let mut builder = Builder::default();
        let mut cursor = 0;

        for caps in ACTION_RE.captures_iter(source) {
            let (Some(whole), Some(inner)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            builder.text(&source[cursor..whole.start()])?;
            cursor = whole.end();
            builder.action(inner.as_str().trim())?;
        }
        builder.text(&source[cursor..])?;

        Ok(Self {
            nodes: builder.finish()?,
        })
    }

    /// Render against a prompt context.
    pub fn render(&self, ctx: &PromptContext) -> Result<String, TemplateError> {
        let mut out = String::new();
        render_nodes(&self.nodes, ctx, None, &mut out)?;
        Ok(out)
    }
}

fn render_nodes(
    nodes: &[Node],
    ctx: &PromptContext,
    dot: Option<&str>,
    out: &mut String,
) -> Result<(), TemplateError> {
    for node in nodes {
        match node {
            Node::Text(text) => out.push_str(text),
            Node::Dot => match dot {
                Some(value) => out.push_str(value),
                None => {
                    return Err(TemplateError::Render(
                        "{{.}} used outside of a range block".to_string(),
                    ));
                }
            },
            Node::Field(field) => match lookup(ctx, field)? {
                Value::Str(s) => out.push_str(s),
                Value::Bool(b) => out.push_str(if b { "true" } else { "false" }),
                Value::List(items) => out.push_str(&items.join(", ")),
            },
            Node::If {
                field,
                then,
                otherwise,
            } => {
                let branch = if lookup(ctx, field)?.truthy() {
                    then
                } else {
                    otherwise
                };
                render_nodes(branch, ctx, dot, out)?;
            }
            Node::Range { field, body } => match lookup(ctx, field)? {
                Value::List(items) => {
                    for item in items {
                        render_nodes(body, ctx, Some(item), out)?;
                    }
                }
                _ => {
                    return Err(TemplateError::Render(format!(
                        "cannot range over non-list field .{field}"
                    )));
                }
            },
        }
    }
    Ok(())
}
