use anyhow::Result;
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use tempfile::{tempdir, TempDir};
use zip::write::SimpleFileOptions;

fn create_docx(dir: &TempDir, name: &str, lines: &[&str]) -> Result<()> {
    let body: String = lines
        .iter()
        .map(|line| format!("<w:p><w:r><w:t>{}</w:t></w:r></w:p>", line))
        .collect();
    let xml = format!(
        "<w:document xmlns:w=\"http://schemas.openxmlformats.org/wordprocessingml/2006/main\">\
         <w:body>{}</w:body></w:document>",
        body
    );

    let mut zip = zip::ZipWriter::new(File::create(dir.path().join(name))?);
    zip.start_file("word/document.xml", SimpleFileOptions::default())?;
    zip.write_all(xml.as_bytes())?;
    zip.finish()?;
    Ok(())
}

fn docseek(dir: &Path) -> Result<Command> {
    let mut cmd = Command::cargo_bin("docseek-cli")?;
    cmd.current_dir(dir)
        .env_remove("RUST_LOG")
        .arg(dir)
        .arg("--no-progress");
    Ok(cmd)
}

#[test]
fn test_search_prints_report() -> Result<()> {
    let dir = tempdir()?;
    create_docx(
        &dir,
        "a.docx",
        &["title", "second line", "hello world", "fourth line", "end"],
    )?;

    docseek(dir.path())?
        .arg("hello")
        .assert()
        .success()
        .stdout(predicate::str::contains("Searching 1 files for 1 terms..."))
        .stdout(predicate::str::contains("Found 1 matches:"))
        .stdout(predicate::str::contains("a.docx"))
        .stdout(predicate::str::contains(
            "Match for 'hello' at line 3:\nsecond line\nhello world\nfourth line\n",
        ))
        .stdout(predicate::str::contains("-".repeat(60)));
    Ok(())
}

#[test]
fn test_no_matches() -> Result<()> {
    let dir = tempdir()?;
    create_docx(&dir, "a.docx", &["nothing to see"])?;

    docseek(dir.path())?
        .arg("missing")
        .assert()
        .success()
        .stdout(predicate::str::contains("No matches found."));
    Ok(())
}

#[test]
fn test_no_candidate_files() -> Result<()> {
    let dir = tempdir()?;
    fs::write(dir.path().join("notes.txt"), "hello")?;

    docseek(dir.path())?
        .arg("hello")
        .assert()
        .success()
        .stdout(predicate::str::contains("No files with extensions"))
        .stdout(predicate::str::contains("Searching").not());
    Ok(())
}

#[test]
fn test_whole_word_with_regex_is_rejected() -> Result<()> {
    let dir = tempdir()?;
    create_docx(&dir, "a.docx", &["hello"])?;

    docseek(dir.path())?
        .args(["hello", "-w", "-r"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("whole-word"));
    Ok(())
}

#[test]
fn test_missing_directory_fails() -> Result<()> {
    let dir = tempdir()?;
    let missing = dir.path().join("nope");

    Command::cargo_bin("docseek-cli")?
        .arg(&missing)
        .arg("hello")
        .assert()
        .failure();
    Ok(())
}

#[test]
fn test_output_file() -> Result<()> {
    let dir = tempdir()?;
    create_docx(&dir, "a.docx", &["invoice due", "paid"])?;
    let report = dir.path().join("report.txt");

    docseek(dir.path())?
        .arg("invoice")
        .arg("-o")
        .arg(&report)
        .assert()
        .success()
        .stdout(predicate::str::contains("Results saved to"))
        .stdout(predicate::str::contains("Found").not());

    let written = fs::read_to_string(&report)?;
    assert!(written.starts_with("Found 1 matches:\n\nFile: "));
    assert!(written.contains("Match for 'invoice' at line 1:\ninvoice due\npaid\n"));
    Ok(())
}

#[test]
fn test_invalid_regex_is_skipped() -> Result<()> {
    let dir = tempdir()?;
    create_docx(&dir, "a.docx", &["order 4411 shipped"])?;

    docseek(dir.path())?
        .args(["(broken", r"order \d+", "-r"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r"Match for 'order \d+' at line 1:"))
        .stdout(predicate::str::contains("(broken").not());
    Ok(())
}

#[test]
fn test_case_sensitive_and_extensions() -> Result<()> {
    let dir = tempdir()?;
    create_docx(&dir, "a.docx", &["Budget"])?;
    fs::write(dir.path().join("b.pdf"), "not really a pdf")?;

    docseek(dir.path())?
        .args(["budget", "-c"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No matches found."));

    docseek(dir.path())?
        .args(["Budget", "-e", "docx"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Searching 1 files for 1 terms..."))
        .stdout(predicate::str::contains("Found 1 matches:"));
    Ok(())
}

#[test]
fn test_config_file_supplies_defaults() -> Result<()> {
    let dir = tempdir()?;
    create_docx(&dir, "a.docx", &["Quarterly Report"])?;
    let config = dir.path().join("custom.yaml");
    fs::write(&config, "case_sensitive: true\nthread_count: 2\n")?;

    docseek(dir.path())?
        .arg("report")
        .arg("--config")
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("No matches found."));
    Ok(())
}

#[test]
fn test_terms_from_config_file() -> Result<()> {
    let dir = tempdir()?;
    create_docx(&dir, "a.docx", &["intro", "renewal date is March"])?;
    let config = dir.path().join("terms.yaml");
    fs::write(&config, "terms: [\"renewal\"]\n")?;

    docseek(dir.path())?
        .arg("--config")
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("Searching 1 files for 1 terms..."))
        .stdout(predicate::str::contains("Match for 'renewal' at line 2:"));
    Ok(())
}

#[test]
fn test_no_terms_anywhere_is_rejected() -> Result<()> {
    let dir = tempdir()?;
    create_docx(&dir, "a.docx", &["hello"])?;

    docseek(dir.path())?
        .assert()
        .failure()
        .stderr(predicate::str::contains("no search terms given"));
    Ok(())
}
