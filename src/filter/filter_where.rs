use super::types::{Conjunction, FilterOp, SqlValue};

/// One node of a predicate: a column comparison or a parenthesised group.
#[derive(Debug, Clone, PartialEq)]
pub enum Clause {
    Compare {
        column: &'static str,
        op: FilterOp,
        value: SqlValue,
    },
    Group {
        conjunction: Conjunction,
        clauses: Vec<Clause>,
    },
}

/// Ordered list of clauses joined with AND at the top level.
///
/// Column names are `&'static str` so only identifiers written in this crate
/// can reach the SQL text; every value is bound.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterWhere {
    clauses: Vec<Clause>,
}

impl FilterWhere {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    pub fn compare(mut self, column: &'static str, op: FilterOp, value: impl Into<SqlValue>) -> Self {
        self.clauses.push(Clause::Compare {
            column,
            op,
            value: value.into(),
        });
        self
    }

    pub fn eq(self, column: &'static str, value: impl Into<SqlValue>) -> Self {
        self.compare(column, FilterOp::Eq, value)
    }

    /// `(a op v OR b op v OR ...)` with the same value for every column.
    pub fn any_of(mut self, columns: &[&'static str], op: FilterOp, value: impl Into<SqlValue>) -> Self {
        let value = value.into();
        let clauses = columns
            .iter()
            .map(|column| Clause::Compare {
                column,
                op,
                value: value.clone(),
            })
            .collect();
        self.clauses.push(Clause::Group {
            conjunction: Conjunction::Or,
            clauses,
        });
        self
    }

    /// Render to SQL, numbering placeholders after `starting_param_index`.
    /// An empty predicate renders as `1=1`.
    pub fn generate(&self, starting_param_index: usize) -> (String, Vec<SqlValue>) {
        let mut renderer = Renderer {
            param_values: Vec::new(),
            param_index: starting_param_index,
        };
        let sql = renderer.render_all(&self.clauses, Conjunction::And);
        (sql, renderer.param_values)
    }
}

struct Renderer {
    param_values: Vec<SqlValue>,
    param_index: usize,
}

impl Renderer {
    fn render_all(&mut self, clauses: &[Clause], conjunction: Conjunction) -> String {
        if clauses.is_empty() {
            // Neutral element: AND of nothing is true, OR of nothing is false.
            return match conjunction {
                Conjunction::And => "1=1".to_string(),
                Conjunction::Or => "1=0".to_string(),
            };
        }

        clauses
            .iter()
            .map(|clause| self.render(clause))
            .collect::<Vec<_>>()
            .join(conjunction.to_sql())
    }

    fn render(&mut self, clause: &Clause) -> String {
        match clause {
            Clause::Compare { column, op, value } => {
                let placeholder = self.param(value.clone());
                format!("\"{}\" {} {}", column, op.to_sql(), placeholder)
            }
            Clause::Group {
                conjunction,
                clauses,
            } => format!("({})", self.render_all(clauses, *conjunction)),
        }
    }

    fn param(&mut self, value: SqlValue) -> String {
        self.param_values.push(value);
        self.param_index += 1;
        format!("${}", self.param_index)
    }
}

/// Escape `%`, `_` and `\` so user text matches literally inside LIKE.
pub fn escape_like(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// `%<escaped>%` substring pattern.
pub fn contains_pattern(raw: &str) -> String {
    format!("%{}%", escape_like(raw))
}
