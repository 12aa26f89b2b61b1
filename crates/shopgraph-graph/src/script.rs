//! Cypher script execution.
//!
//! A script is a sequence of statements separated by `;`. Statements run one
//! at a time in order; a failing statement is recorded and the run continues.

use async_trait::async_trait;
use tracing::{error, info};

/// Characters of each statement shown in logs and reports.
const PREVIEW_CHARS: usize = 60;

/// Something that can execute a single Cypher statement.
#[async_trait]
pub trait CypherExecutor: Send + Sync {
    async fn run_statement(&self, statement: &str) -> anyhow::Result<()>;
}

/// Result of one statement in a script run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatementOutcome {
    /// 1-based position in the script.
    pub index: usize,
    pub preview: String,
    pub error: Option<String>,
}

/// Per-statement results of a script run.
#[derive(Debug, Clone, Default)]
pub struct ScriptReport {
    pub outcomes: Vec<StatementOutcome>,
}

impl ScriptReport {
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.error.is_none()).count()
    }

    pub fn failed(&self) -> impl Iterator<Item = &StatementOutcome> {
        self.outcomes.iter().filter(|o| o.error.is_some())
    }

    pub fn is_clean(&self) -> bool {
        self.failed().next().is_none()
    }
}

/// Split script text into trimmed, non-empty statements.
///
/// `;` separates statements except inside quoted literals or backtick
/// identifiers. `//` comments run to end of line and `/* ... */` comments
/// run to their closing `*/`; both are dropped.
pub fn split_statements(text: &str) -> Vec<String> {
    let mut statements = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if let Some(q) = quote {
            current.push(c);
            if c == '\\' && q != '`' {
                if let Some(escaped) = chars.next() {
                    current.push(escaped);
                }
            } else if c == q {
                quote = None;
            }
            continue;
        }

        match c {
            '\'' | '"' | '`' => {
                quote = Some(c);
                current.push(c);
            }
            '/' if chars.peek() == Some(&'/') => {
                while let Some(&next) = chars.peek() {
                    if next == '\n' {
                        break;
                    }
                    chars.next();
                }
            }
            '/' if chars.peek() == Some(&'*') => {
                chars.next();
                let mut prev = '\0';
                for next in chars.by_ref() {
                    if prev == '*' && next == '/' {
                        break;
                    }
                    prev = next;
                }
                current.push(' ');
            }
            ';' => flush(&mut statements, &mut current),
            _ => current.push(c),
        }
    }
    flush(&mut statements, &mut current);
    statements
}

fn flush(statements: &mut Vec<String>, current: &mut String) {
    let stmt = current.trim();
    if !stmt.is_empty() {
        statements.push(stmt.to_string());
    }
    current.clear();
}

fn preview(statement: &str) -> String {
    statement
        .chars()
        .map(|c| if c.is_whitespace() { ' ' } else { c })
        .take(PREVIEW_CHARS)
        .collect()
}

/// Run every statement of `text` in order.
pub async fn run_script<E>(executor: &E, text: &str) -> ScriptReport
where
    E: CypherExecutor + ?Sized,
{
    let mut report = ScriptReport::default();

    for (i, statement) in split_statements(text).iter().enumerate() {
        let index = i + 1;
        let preview = preview(statement);
        info!("Statement {}: {}...", index, preview);

        let error = match executor.run_statement(statement).await {
            Ok(()) => None,
            Err(e) => {
                error!(index, error = %e, "Statement failed");
                Some(format!("{:#}", e))
            }
        };
        report.outcomes.push(StatementOutcome {
            index,
            preview,
            error,
        });
    }

    info!(
        total = report.outcomes.len(),
        succeeded = report.succeeded(),
        "Script finished"
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn test_split_drops_empty_statements() {
        let stmts = split_statements("RETURN 1;\n ; \nRETURN 2;");
        assert_eq!(stmts, vec!["RETURN 1", "RETURN 2"]);
    }

    #[test]
    fn test_split_respects_quotes() {
        let stmts = split_statements("CREATE (:Review {text: 'ok; really'});RETURN \"a;b\"");
        assert_eq!(stmts.len(), 2);
        assert_eq!(stmts[0], "CREATE (:Review {text: 'ok; really'})");
    }

    #[test]
    fn test_split_handles_escaped_quote() {
        let stmts = split_statements("RETURN 'it\\'s; fine'; RETURN 3");
        assert_eq!(stmts, vec!["RETURN 'it\\'s; fine'", "RETURN 3"]);
    }

    #[test]
    fn test_split_strips_line_comments() {
        let stmts = split_statements("// header; not a statement\nRETURN 'http://x' // trailing\n;");
        assert_eq!(stmts, vec!["RETURN 'http://x'"]);
    }

    #[test]
    fn test_split_strips_block_comments() {
        let stmts = split_statements("/* seed; v2 */ RETURN 1 /* a;\nb */;\nRETURN '/* kept; */'");
        assert_eq!(stmts, vec!["RETURN 1", "RETURN '/* kept; */'"]);
    }

    #[test]
    fn test_split_unterminated_block_comment_swallows_rest() {
        let stmts = split_statements("RETURN 1; /* open; RETURN 2;");
        assert_eq!(stmts, vec!["RETURN 1"]);
    }

    #[test]
    fn test_preview_is_single_line_and_bounded() {
        let p = preview(&format!("MATCH (n)\nRETURN {}", "x".repeat(100)));
        assert_eq!(p.chars().count(), PREVIEW_CHARS);
        assert!(!p.contains('\n'));
    }

    struct Recorder {
        seen: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl CypherExecutor for Recorder {
        async fn run_statement(&self, statement: &str) -> anyhow::Result<()> {
            self.seen.lock().unwrap().push(statement.to_string());
            if statement.contains("BOOM") {
                anyhow::bail!("syntax error");
            }
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_run_continues_after_failure() {
        let recorder = Recorder {
            seen: Mutex::new(Vec::new()),
        };
        let report = run_script(&recorder, "RETURN 1; BOOM; RETURN 3;").await;

        assert_eq!(recorder.seen.lock().unwrap().len(), 3);
        assert_eq!(report.succeeded(), 2);
        let failed: Vec<usize> = report.failed().map(|o| o.index).collect();
        assert_eq!(failed, vec![2]);
        assert!(!report.is_clean());
    }
}
