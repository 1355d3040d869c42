use std::fmt::Write as _;

pub const DRIVER_SCRIPT_NAME: &str = "execute_all.sh";

/// Shell script replaying every generated SQL file in order through
/// `<db_command> db:sql`, stopping at the first non-zero exit status.
pub fn render_driver_script<S: AsRef<str>>(db_command: &str, sql_files: &[S]) -> String {
    let mut out = String::new();
    out.push_str("#!/bin/bash\n\n");
    out.push_str("# Execute all SQL files in order\n");
    out.push_str("echo 'Starting database update...'\n\n");
    for file in sql_files {
        let file = file.as_ref();
        let _ = writeln!(out, "echo 'Executing {file}...'");
        let _ = writeln!(out, "{db_command} db:sql < {file}");
        out.push_str("if [ $? -ne 0 ]; then\n");
        let _ = writeln!(out, "    echo 'Error executing {file}'");
        out.push_str("    exit 1\n");
        out.push_str("fi\n\n");
    }
    out.push_str("echo 'Database update completed successfully!'\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn script_runs_files_in_order_and_aborts_on_failure() {
        let files = ["partners_batch_1.sql", "partners_batch_2.sql", "partners_batch_3.sql"];
        let script = render_driver_script("platform", &files);

        assert!(script.starts_with("#!/bin/bash\n"));
        assert_eq!(script.matches("if [ $? -ne 0 ]; then").count(), 3);
        assert_eq!(script.matches("    exit 1\n").count(), 3);

        let positions: Vec<_> = files
            .iter()
            .map(|f| script.find(&format!("platform db:sql < {f}\n")).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
        assert!(script.ends_with("echo 'Database update completed successfully!'\n"));
    }

    #[test]
    fn single_file_block_matches_expected_layout() {
        let script = render_driver_script("platform", &["partners_batch_1.sql".to_string()]);
        let expected = "\
#!/bin/bash

# Execute all SQL files in order
echo 'Starting database update...'

echo 'Executing partners_batch_1.sql...'
platform db:sql < partners_batch_1.sql
if [ $? -ne 0 ]; then
    echo 'Error executing partners_batch_1.sql'
    exit 1
fi

echo 'Database update completed successfully!'
";
        assert_eq!(script, expected);
    }

    #[test]
    fn empty_run_still_produces_a_valid_script() {
        let script = render_driver_script::<&str>("mysql", &[]);
        assert!(!script.contains("db:sql"));
        assert!(script.contains("completed successfully"));
    }
}
