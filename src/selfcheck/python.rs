//! Python source analysis
//!
//! Parses Python with tree-sitter without executing anything. The grammar
//! is looser than the Python 3 compiler, so a second pass over the tree
//! rejects what it lets through: Python 2 `print`/`exec` statements,
//! `return`/`yield` outside a function, `break`/`continue` outside a loop,
//! and statements indented differently from their siblings.
//!
//! Function lookup queries the syntax tree; when the tree contains errors, a
//! textual `def name(` search backs it up so a half-broken file can still be
//! inspected.

use std::fmt;
use std::fs;
use std::path::Path;

use regex::Regex;
use streaming_iterator::StreamingIterator;
use tree_sitter::{Language, Node, Parser, Query, QueryCursor, Tree};

use crate::core::{LeadHooksError, LeadHooksResult};

/// Captures the name of every function definition, sync or async, at any depth
const FUNCTION_NAMES_QUERY: &str = "(function_definition name: (identifier) @name)";

/// Longest snippet quoted in a syntax error message
const MAX_SNIPPET_LEN: usize = 40;

fn python_language() -> Language {
    tree_sitter_python::LANGUAGE.into()
}

/// First syntax error found in a file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    /// 1-indexed line
    pub line: usize,
    /// 1-indexed column
    pub column: usize,
    /// What went wrong
    pub message: String,
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (line {}, column {})", self.message, self.line, self.column)
    }
}

/// How a function definition was found
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Detection {
    /// Found as a `function_definition` node in the syntax tree
    SyntaxTree,
    /// Found by text search because the file does not parse cleanly
    Textual,
}

/// A parsed Python source file
///
/// Function names and the first syntax error are computed once at parse
/// time; lookups afterwards do not touch the tree.
pub struct PythonModule {
    source: String,
    function_names: Vec<String>,
    syntax_error: Option<SyntaxError>,
    tree_has_errors: bool,
}

impl PythonModule {
    /// Parse Python source
    pub fn parse(source: impl Into<String>) -> LeadHooksResult<Self> {
        let source = source.into();
        let language = python_language();

        let mut parser = Parser::new();
        parser
            .set_language(&language)
            .map_err(|e| LeadHooksError::parser(format!("Failed to set language: {}", e)))?;

        let tree = parser
            .parse(&source, None)
            .ok_or_else(|| LeadHooksError::parser("Failed to parse source"))?;

        let function_names = collect_function_names(&language, &tree, &source)?;

        let root = tree.root_node();
        let tree_has_errors = root.has_error();
        let syntax_error = if tree_has_errors {
            Some(first_error(root, &source).unwrap_or_else(|| SyntaxError {
                line: 1,
                column: 1,
                message: "invalid syntax".to_string(),
            }))
        } else {
            first_rejected(root, &source, Scope::default())
        };

        Ok(Self {
            source,
            function_names,
            syntax_error,
            tree_has_errors,
        })
    }

    /// Read and parse a Python file
    pub fn load(path: &Path) -> LeadHooksResult<Self> {
        Self::parse(fs::read_to_string(path)?)
    }

    /// The source text
    pub fn source(&self) -> &str {
        &self.source
    }

    /// True when the file would compile
    pub fn is_valid(&self) -> bool {
        self.syntax_error.is_none()
    }

    /// The first syntax error, in document order
    pub fn syntax_error(&self) -> Option<&SyntaxError> {
        self.syntax_error.as_ref()
    }

    /// Names of all functions defined in the file, in document order
    pub fn function_names(&self) -> &[String] {
        &self.function_names
    }

    /// Look for a function definition by name
    pub fn find_function(&self, name: &str) -> Option<Detection> {
        if self.function_names.iter().any(|n| n == name) {
            return Some(Detection::SyntaxTree);
        }

        if self.tree_has_errors && defines_function_textually(&self.source, name) {
            tracing::debug!("[PythonModule] '{}' found by text search only", name);
            return Some(Detection::Textual);
        }

        None
    }
}

impl fmt::Debug for PythonModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PythonModule")
            .field("bytes", &self.source.len())
            .field("functions", &self.function_names.len())
            .field("valid", &self.is_valid())
            .finish()
    }
}

/// Text search for `def name(`, allowing `async` and extra spaces
pub fn defines_function_textually(source: &str, name: &str) -> bool {
    let pattern = format!(r"(?m)^[ \t]*(?:async[ \t]+)?def[ \t]+{}[ \t]*\(", regex::escape(name));
    match Regex::new(&pattern) {
        Ok(regex) => regex.is_match(source),
        Err(_) => source.contains(&format!("def {}(", name)),
    }
}

fn collect_function_names(language: &Language, tree: &Tree, source: &str) -> LeadHooksResult<Vec<String>> {
    let query = Query::new(language, FUNCTION_NAMES_QUERY)
        .map_err(|e| LeadHooksError::parser(format!("Invalid query: {}", e)))?;

    let mut cursor = QueryCursor::new();
    let mut matches = cursor.matches(&query, tree.root_node(), source.as_bytes());

    let mut names = Vec::new();
    while let Some(query_match) = matches.next() {
        for capture in query_match.captures {
            if let Ok(name) = capture.node.utf8_text(source.as_bytes()) {
                names.push(name.to_string());
            }
        }
    }

    Ok(names)
}

/// Depth-first search for the first ERROR or MISSING node
fn first_error(node: Node<'_>, source: &str) -> Option<SyntaxError> {
    if node.is_missing() {
        return Some(error_at(node, format!("missing `{}`", node.kind())));
    }

    if node.is_error() {
        let text = node.utf8_text(source.as_bytes()).unwrap_or("");
        let snippet = text.lines().next().unwrap_or("").trim();
        let message = if snippet.is_empty() {
            "invalid syntax".to_string()
        } else {
            format!("unexpected `{}`", truncate(snippet, MAX_SNIPPET_LEN))
        };
        return Some(error_at(node, message));
    }

    let mut cursor = node.walk();
    let children: Vec<Node<'_>> = node.children(&mut cursor).collect();
    children
        .into_iter()
        .filter(|child| child.has_error())
        .find_map(|child| first_error(child, source))
}

/// What encloses a node
#[derive(Debug, Clone, Copy, Default)]
struct Scope {
    in_function: bool,
    in_loop: bool,
}

/// Depth-first search for the first construct the grammar accepts but
/// Python 3 does not
fn first_rejected(node: Node<'_>, source: &str, scope: Scope) -> Option<SyntaxError> {
    let message = match node.kind() {
        "print_statement" => Some("Missing parentheses in call to 'print'"),
        "exec_statement" => Some("Missing parentheses in call to 'exec'"),
        "return_statement" if !scope.in_function => Some("'return' outside function"),
        "yield" if node.is_named() && !scope.in_function => Some("'yield' outside function"),
        "break_statement" if !scope.in_loop => Some("'break' outside loop"),
        "continue_statement" if !scope.in_loop => Some("'continue' not properly in loop"),
        _ => None,
    };
    if let Some(message) = message {
        return Some(error_at(node, message.to_string()));
    }

    if matches!(node.kind(), "module" | "block") {
        if let Some(error) = misaligned_statement(node, source) {
            return Some(error);
        }
    }

    // Only a loop's body is inside the loop; its `else` clause is not
    let loop_body = match node.kind() {
        "for_statement" | "while_statement" => node.child_by_field_name("body").map(|body| body.id()),
        _ => None,
    };

    let mut cursor = node.walk();
    let children: Vec<Node<'_>> = node.named_children(&mut cursor).collect();
    children.into_iter().find_map(|child| {
        let inner = match node.kind() {
            "function_definition" | "lambda" => Scope {
                in_function: true,
                in_loop: false,
            },
            "class_definition" => Scope::default(),
            _ if loop_body == Some(child.id()) => Scope {
                in_loop: true,
                ..scope
            },
            _ => scope,
        };
        first_rejected(child, source, inner)
    })
}

/// First statement that starts a line at a different column from the
/// statements before it; module-level statements must start at column 0
fn misaligned_statement(node: Node<'_>, source: &str) -> Option<SyntaxError> {
    let mut expected = if node.kind() == "module" { Some(0) } else { None };

    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        if matches!(child.kind(), "comment" | "line_continuation") || !starts_line(child, source) {
            continue;
        }

        let column = child.start_position().column;
        match expected {
            None => expected = Some(column),
            Some(indent) if column > indent => {
                return Some(error_at(child, "unexpected indent".to_string()));
            }
            Some(indent) if column < indent => {
                return Some(error_at(
                    child,
                    "unindent does not match any outer indentation level".to_string(),
                ));
            }
            Some(_) => {}
        }
    }

    None
}

/// True when only whitespace precedes the node on its line
fn starts_line(node: Node<'_>, source: &str) -> bool {
    let before = source.get(..node.start_byte()).unwrap_or("");
    let line_start = before.rfind('\n').map_or(0, |i| i + 1);
    before[line_start..].trim().is_empty()
}

fn error_at(node: Node<'_>, message: String) -> SyntaxError {
    let position = node.start_position();
    SyntaxError {
        line: position.row + 1,
        column: position.column + 1,
        message,
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() > max_chars {
        let cut: String = text.chars().take(max_chars).collect();
        format!("{}...", cut)
    } else {
        text.to_string()
    }
}
