use std::{
    path::Path,
    process::{Command, Output},
};

fn linuxtutor(data_dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_linuxtutor"))
        .args(args)
        .env("LINUXTUTOR_DATA_DIR", data_dir)
        .env_remove("LINUXTUTOR_LOG")
        .output()
        .expect("failed to run linuxtutor")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn search_finds_security_lesson() -> Result<(), Box<dyn std::error::Error>> {
    let tmp = tempfile::tempdir()?;
    let out = linuxtutor(tmp.path(), &["search", "file", "security"]);

    assert!(out.status.success(), "stderr: {}", stderr(&out));
    let text = stdout(&out);
    assert!(text.contains("Linux Security Fundamentals"), "{text}");
    assert!(text.contains("Lesson: security-basics"), "{text}");
    assert!(text.contains("Matched in:"), "{text}");
    Ok(())
}

#[test]
fn search_json_respects_level_filter() -> Result<(), Box<dyn std::error::Error>>
{
    let tmp = tempfile::tempdir()?;
    let out = linuxtutor(
        tmp.path(),
        &["search", "process", "--level", "intermediate", "--json"],
    );

    assert!(out.status.success(), "stderr: {}", stderr(&out));
    let json: serde_json::Value = serde_json::from_slice(&out.stdout)?;
    let results = json["results"].as_array().expect("results array");
    assert!(!results.is_empty());
    for r in results {
        assert_eq!(r["level"], "intermediate");
    }
    Ok(())
}

#[test]
fn search_rejects_unknown_level() -> Result<(), Box<dyn std::error::Error>> {
    let tmp = tempfile::tempdir()?;
    let out = linuxtutor(tmp.path(), &["search", "file", "-l", "guru"]);

    assert!(!out.status.success());
    let err = stderr(&out);
    assert!(err.contains("invalid level 'guru'"), "{err}");
    assert!(
        err.contains("choose from: beginner, intermediate, advanced, expert"),
        "{err}"
    );
    assert!(!err.contains("InvalidLevel"), "{err}");
    Ok(())
}

#[test]
fn search_with_blank_keyword_is_empty_query()
-> Result<(), Box<dyn std::error::Error>> {
    let tmp = tempfile::tempdir()?;
    let out = linuxtutor(tmp.path(), &["search", "   "]);

    assert!(!out.status.success());
    let err = stderr(&out);
    assert!(err.contains("please provide at least one keyword"), "{err}");
    assert!(!err.contains("EmptyQuery"), "{err}");
    Ok(())
}

#[test]
fn search_without_matches_succeeds() -> Result<(), Box<dyn std::error::Error>>
{
    let tmp = tempfile::tempdir()?;
    let out = linuxtutor(tmp.path(), &["search", "xyzzy_nonexistent_12345"]);

    assert!(out.status.success(), "stderr: {}", stderr(&out));
    assert!(stdout(&out).contains("No lessons found matching"));
    Ok(())
}

#[test]
fn progress_round_trip() -> Result<(), Box<dyn std::error::Error>> {
    let tmp = tempfile::tempdir()?;

    let out = linuxtutor(tmp.path(), &["lesson", "intro-to-terminal"]);
    assert!(out.status.success(), "stderr: {}", stderr(&out));
    assert!(stdout(&out).contains("Introduction to the Terminal"));

    let out = linuxtutor(tmp.path(), &["status"]);
    assert!(stdout(&out).contains("Current Lesson: intro-to-terminal"));

    let out = linuxtutor(tmp.path(), &["complete", "intro-to-terminal"]);
    assert!(out.status.success(), "stderr: {}", stderr(&out));

    let out = linuxtutor(tmp.path(), &["status"]);
    let text = stdout(&out);
    assert!(text.contains("Lessons Completed: 1"), "{text}");
    assert!(text.contains("Exercises Completed: 1"), "{text}");
    assert!(!text.contains("Current Lesson"), "{text}");

    let out = linuxtutor(tmp.path(), &["lessons", "beginner"]);
    assert!(stdout(&out).contains("✓ 4. Intro To Terminal"));
    Ok(())
}

#[test]
fn lesson_with_missing_prerequisites_is_refused()
-> Result<(), Box<dyn std::error::Error>> {
    let tmp = tempfile::tempdir()?;

    let out = linuxtutor(tmp.path(), &["lesson", "shell-scripting"]);
    assert!(out.status.success());
    assert!(stdout(&out).contains("Cannot start 'shell-scripting' yet."));

    let out = linuxtutor(tmp.path(), &["status"]);
    assert!(!stdout(&out).contains("Current Lesson"));
    Ok(())
}

#[test]
fn unknown_lesson_suggests_alternatives()
-> Result<(), Box<dyn std::error::Error>> {
    let tmp = tempfile::tempdir()?;
    let out = linuxtutor(tmp.path(), &["lesson", "security"]);

    assert!(!out.status.success());
    let err = stderr(&out);
    assert!(err.contains("Did you mean:"), "{err}");
    assert!(err.contains("security-basics"), "{err}");
    assert!(err.contains("Error: lesson not found: security"), "{err}");
    Ok(())
}

#[test]
fn blank_lesson_name_has_no_suggestions()
-> Result<(), Box<dyn std::error::Error>> {
    let tmp = tempfile::tempdir()?;
    let out = linuxtutor(tmp.path(), &["lesson", ""]);

    assert!(!out.status.success());
    let err = stderr(&out);
    assert!(!err.contains("Did you mean:"), "{err}");
    Ok(())
}

#[test]
fn search_rejects_zero_limit() -> Result<(), Box<dyn std::error::Error>> {
    let tmp = tempfile::tempdir()?;
    let out = linuxtutor(tmp.path(), &["search", "file", "-n", "0"]);

    assert!(!out.status.success());
    assert!(!stdout(&out).contains("No lessons found matching"));
    Ok(())
}

#[test]
fn level_command_validates_and_persists()
-> Result<(), Box<dyn std::error::Error>> {
    let tmp = tempfile::tempdir()?;

    assert!(!linuxtutor(tmp.path(), &["level", "guru"]).status.success());

    let out = linuxtutor(tmp.path(), &["level", "advanced"]);
    assert!(out.status.success());
    assert!(stdout(&linuxtutor(tmp.path(), &["status"]))
        .contains("Current Level: Advanced"));
    Ok(())
}

#[test]
fn start_welcomes_then_resumes() -> Result<(), Box<dyn std::error::Error>> {
    let tmp = tempfile::tempdir()?;

    let first = stdout(&linuxtutor(tmp.path(), &["start"]));
    assert!(first.contains("Welcome to LinuxTutor!"), "{first}");
    assert!(first.contains("Introduction to the Terminal"), "{first}");

    let second = stdout(&linuxtutor(tmp.path(), &["start"]));
    assert!(second.contains("Welcome back"), "{second}");
    assert!(second.contains("ongoing lesson: Intro To Terminal"), "{second}");
    Ok(())
}
