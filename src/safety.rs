//! Denylist check applied to free-text SQL before the passthrough runs it.
//!
//! This is plain substring matching, kept exactly as the query tool has always
//! behaved. It rejects harmless identifiers such as `created_at` and it does not
//! parse SQL. The passthrough additionally runs on a read-only connection.

const DENYLIST: [&str; 16] = [
    "drop", "delete", "truncate", "alter", "create", "insert", "update", "grant", "revoke", "exec",
    "execute", "sp_", "xp_", "--", "/*", "*/",
];

pub fn is_safe_query(sql: &str) -> bool {
    let sql = sql.trim().to_lowercase();

    if DENYLIST.iter().any(|keyword| sql.contains(keyword)) {
        return false;
    }

    sql.starts_with("select")
}

/// True when nothing but whitespace follows the first statement terminator.
/// Semicolons inside quoted strings or identifiers do not count.
pub fn is_single_statement(sql: &str) -> bool {
    let mut quote: Option<char> = None;

    for (i, c) in sql.char_indices() {
        match quote {
            Some(close) if c == close => quote = None,
            Some(_) => {}
            None => match c {
                '\'' | '"' | '`' => quote = Some(c),
                '[' => quote = Some(']'),
                ';' => return sql[i + 1..].trim().is_empty(),
                _ => {}
            },
        }
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_selects_pass() {
        assert!(is_safe_query("SELECT * FROM employees"));
        assert!(is_safe_query("   select name from departments order by id  "));
        assert!(is_safe_query("SeLeCt COUNT(*) FROM employees WHERE salary > 10"));
    }

    #[test]
    fn non_select_statements_are_rejected() {
        for sql in [
            "",
            "pragma table_info(employees)",
            "with x as (select 1) select * from x",
            "explain select 1",
            "vacuum",
        ] {
            assert!(!is_safe_query(sql), "{sql:?} should be rejected");
        }
    }

    #[test]
    fn every_denylisted_substring_is_rejected_after_select() {
        for keyword in DENYLIST {
            let sql = format!("select * from employees where name = '{keyword}'");
            assert!(!is_safe_query(&sql), "{sql:?} should be rejected");
        }
    }

    #[test]
    fn denylist_is_case_insensitive_and_substring_based() {
        assert!(!is_safe_query("select * from employees; --"));
        assert!(!is_safe_query("SELECT 1; DROP TABLE employees"));
        assert!(!is_safe_query("select created_at from employees"));
        assert!(!is_safe_query("select * from employees /* hi */"));
        assert!(!is_safe_query("select updated from t"));
    }

    #[test]
    fn only_one_statement_may_be_given() {
        assert!(is_single_statement("select 1"));
        assert!(is_single_statement("select 1;"));
        assert!(is_single_statement("select 1;  \n"));
        assert!(is_single_statement("select ';' as a, \"x;y\" from [a;b]"));
        assert!(!is_single_statement("select 1 as a; select 2 as a"));
        assert!(!is_single_statement("select 1;;"));
        assert!(!is_single_statement("select 'a''b'; select 2"));
    }
}
