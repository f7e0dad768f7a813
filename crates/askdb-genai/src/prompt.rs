//! Prompt construction.
//!
//! The prompt is a contract, not an implementation detail: it is the
//! primary safety control. It must enumerate the allowed tables as a
//! closed list, demand read-only single-statement raw output, define
//! the refusal sentinel, and require consistent identifier quoting and
//! qualified joins.

use askdb_commons::TableDescription;

/// System instruction sent with every generation request.
pub const SYSTEM_PROMPT: &str = "\
You are an expert PostgreSQL query writer.

Rules you MUST follow:
1. Return ONLY the raw SQL query — no markdown, no code blocks, no explanation.
2. Write only SELECT statements. Never use INSERT, UPDATE, DELETE, DROP, ALTER, TRUNCATE, or any DDL/DML.
3. Use proper PostgreSQL syntax.
4. CRITICAL: You may ONLY reference tables that are explicitly listed in the \"Available tables\" section of the prompt.
   Never infer, guess, or join tables that are not in that list — even if a column name implies a related table exists.
5. If the question cannot be answered using ONLY the available tables and their columns, return: -- Cannot answer: <reason>
6. Always qualify column names when joining tables to avoid ambiguity.
7. Use LIMIT 500 if the query could return many rows.
8. CRITICAL: Always wrap ALL table names and ALL column names in double quotes (e.g., \"users\", \"screenConfig\", \"projectId\").
9. JOIN LOGIC: Use explicit JOINs based on foreign keys described in the schema. If the user asks for email but a table doesn't have it, join with the \"users\" table.
10. ALIASING: If you assign an alias to a table (e.g., \"table\" AS \"t\"), you MUST use that alias for all column references (e.g., \"t\".\"column\"). Never use the original table name if an alias exists.
";

/// Build the user prompt: closed table list, schema docs, question.
pub fn build_prompt(question: &str, context: &[TableDescription]) -> String {
    let available_tables = context
        .iter()
        .map(|doc| doc.table_name.as_str())
        .collect::<Vec<_>>()
        .join(", ");

    let schema_section = context
        .iter()
        .map(|doc| doc.doc.as_str())
        .collect::<Vec<_>>()
        .join("\n\n");

    format!(
        "Available tables (you may ONLY use these): {}\n\n\
         Database Schema:\n{}\n\n\
         Question: {}\n\n\
         SQL Query:",
        available_tables, schema_section, question
    )
}
