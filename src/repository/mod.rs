//! SQL for the `employees` / `departments` table pair.
//!
//! Functions take a plain connection so the same statements run on a pooled
//! connection, inside a transaction, or on a one-off query-tool connection.

pub mod department;
pub mod employee;
