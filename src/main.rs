use std::{collections::BTreeSet, num::NonZeroUsize, process::ExitCode};

use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use linuxtutor::{
    Corpus,
    DataDir,
    Lesson,
    Level,
    ProgressDb,
    cli::{self, Cli, Command},
    error::{self, Error},
    search::{self, SearchParams},
    selector,
};

const SEPARATOR: &str = "==================================================";

fn init_tracing(verbose: u8, quiet: bool) {
    let filter = if let Ok(env) = std::env::var("LINUXTUTOR_LOG") {
        EnvFilter::new(env)
    } else if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("warn"),
            1 => EnvFilter::new("debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> error::Result<()> {
    if let Command::Completions(args) = &cli.command {
        args.generate();
        return Ok(());
    }

    let corpus = Corpus::builtin()?;
    let data_dir = DataDir::resolve(cli.data_dir.as_deref())?;
    let progress = ProgressDb::open(&data_dir.progress_db())?;

    match cli.command {
        Command::Start => cmd_start(&corpus, &progress, &data_dir)?,
        Command::Status => cmd_status(&progress)?,
        Command::Lessons(args) => cmd_lessons(&corpus, &progress, &args)?,
        Command::Lesson(args) => cmd_lesson(&corpus, &progress, &args)?,
        Command::Complete(args) => cmd_complete(&corpus, &progress, &args)?,
        Command::Level(args) => cmd_level(&progress, &args)?,
        Command::Search(args) => cmd_search(&corpus, &progress, &args)?,
        Command::Completions(_) => {}
    }

    Ok(())
}

fn cmd_start(
    corpus: &Corpus,
    progress: &ProgressDb,
    data_dir: &DataDir,
) -> error::Result<()> {
    let level = progress.current_level()?;
    let completed = progress.completed_lessons()?;

    if progress.is_first_time()? {
        println!("Welcome to LinuxTutor!");
        println!("{SEPARATOR}");
        println!("\nYou're about to start your Linux learning journey!");
        println!("\nHere's how it works:");
        println!("  - Progressive lessons from beginner to expert level");
        println!("  - Hands-on exercises with real commands");
        println!("  - Your progress is saved automatically");
        println!(
            "\nYour progress will be saved in: {}",
            data_dir.root().display()
        );
        progress.mark_not_first_time()?;

        if let Some(lesson) =
            selector::next_available_lesson(corpus, level, &completed)
        {
            println!("\nLet's begin with the basics!\n");
            start_lesson(progress, lesson)?;
        }
        return Ok(());
    }

    println!("Welcome back to LinuxTutor!");
    println!("{SEPARATOR}");

    if let Some(current) = progress.current_lesson()? {
        println!(
            "You have an ongoing lesson: {}",
            Lesson::display_name(&current)
        );
        println!("\nTo review it, run:\n  linuxtutor lesson {current}");
        println!("When you're done, run:\n  linuxtutor complete {current}");
        return Ok(());
    }

    println!(
        "Progress: {} lesson(s) completed ({level} level)",
        completed.len()
    );

    if let Some(next) = selector::next_available_lesson(corpus, level, &completed)
    {
        println!(
            "Suggested next lesson: {}",
            Lesson::display_name(&next.id)
        );
        println!("\nTo start it, run:\n  linuxtutor lesson {}", next.id);
    } else if selector::level_complete(corpus, level, &completed) {
        println!(
            "Congratulations! You've completed all lessons in your current level."
        );
        suggest_level_up(level);
    } else {
        println!("The remaining lessons at this level are locked:");
        for (title, missing) in
            selector::blocked_lessons(corpus, level, &completed)
        {
            println!("  - {title} (needs: {})", missing.join(", "));
        }
    }

    Ok(())
}

fn suggest_level_up(level: Level) {
    match level.next() {
        Some(next) => {
            println!("\nReady to level up to {}? Run:", next.title());
            println!("  linuxtutor level {next}");
        }
        None => {
            println!("Amazing! You've mastered all Linux levels!");
        }
    }
}

fn cmd_status(progress: &ProgressDb) -> error::Result<()> {
    println!("Current Level: {}", progress.current_level()?.title());
    println!("Lessons Completed: {}", progress.completed_lessons()?.len());
    println!("Exercises Completed: {}", progress.exercises_completed()?);
    if let Some(current) = progress.current_lesson()? {
        println!("Current Lesson: {current}");
    }
    Ok(())
}

fn cmd_lessons(
    corpus: &Corpus,
    progress: &ProgressDb,
    args: &cli::LessonsArgs,
) -> error::Result<()> {
    let level = match args.level.as_deref() {
        Some(name) => name.parse::<Level>()?,
        None => progress.current_level()?,
    };
    let completed = progress.completed_lessons()?;

    println!("{} Level Lessons:", level.title());
    for (i, id) in selector::lessons_by_level(corpus, level).iter().enumerate()
    {
        let status = if completed.contains(*id) { "✓" } else { "○" };
        println!("  {status} {}. {} ({id})", i + 1, Lesson::display_name(id));
    }
    Ok(())
}

fn cmd_lesson(
    corpus: &Corpus,
    progress: &ProgressDb,
    args: &cli::LessonArgs,
) -> error::Result<()> {
    let Some(lesson) = corpus.get(&args.name) else {
        show_lesson_not_found_help(corpus, &args.name);
        return Err(Error::NotFound {
            kind: "lesson",
            name: args.name.clone(),
        });
    };

    let completed = progress.completed_lessons()?;
    let missing = selector::missing_prerequisites(lesson, &completed);
    if !missing.is_empty() {
        if !args.force {
            println!("Cannot start '{}' yet.", lesson.id);
            println!("You need to complete these lessons first:");
            for id in &missing {
                println!("  - {}", Lesson::display_name(id));
            }
            println!("\nStart with: linuxtutor lesson {}", missing[0]);
            println!("Or run with --force to start anyway.");
            return Ok(());
        }
        warn!(lesson = %lesson.id, ?missing, "starting with missing prerequisites");
    }

    start_lesson(progress, lesson)
}

/// Print a lesson in full and make it the current one.
fn start_lesson(progress: &ProgressDb, lesson: &Lesson) -> error::Result<()> {
    progress.set_current_lesson(&lesson.id)?;
    info!(lesson = %lesson.id, "current lesson set");

    println!("=== {} ===", lesson.title);
    println!("Level: {}", lesson.level.title());
    println!("Duration: ~{} minutes\n", lesson.duration_minutes);
    println!("{}", lesson.description);
    if !lesson.prerequisites.is_empty() {
        println!("\nPrerequisites: {}", lesson.prerequisites.join(", "));
    }

    for (i, section) in lesson.sections.iter().enumerate() {
        println!("\n--- Section {}: {} ---\n", i + 1, section.title);
        if !section.text.is_empty() {
            println!("{}", section.text);
        }
        if !section.commands.is_empty() {
            println!();
            for command in &section.commands {
                println!("  $ {}", command.command);
                println!("      {}", command.description);
            }
        }
    }

    println!("\nWhen you're done, run:\n  linuxtutor complete {}", lesson.id);
    Ok(())
}

fn show_lesson_not_found_help(corpus: &Corpus, name: &str) {
    eprintln!("Lesson '{name}' not found.\n");

    let similar = selector::find_similar_lessons(
        corpus,
        name,
        selector::MAX_SIMILAR_LESSONS,
    );
    if !similar.is_empty() {
        eprintln!("Did you mean:");
        for id in &similar {
            eprintln!("  - {id}");
        }
        eprintln!();
    }

    let parts: Vec<&str> = name.split('-').collect();
    let related = SearchParams::from_terms(parts.as_slice())
        .map(|params| params.with_limit(Some(selector::MAX_SIMILAR_LESSONS)))
        .and_then(|params| search::execute_search(&params, corpus))
        .unwrap_or_default();
    if !related.is_empty() {
        eprintln!("Lessons matching your search:");
        for (i, r) in related.iter().enumerate() {
            eprintln!("  {}. {} ({}) - {}", i + 1, r.title, r.level, r.lesson_id);
        }
        eprintln!();
    }

    eprintln!("Try:");
    eprintln!("  linuxtutor lessons              # Browse available lessons");
    eprintln!("  linuxtutor search {name}   # Search for related lessons");
}

fn cmd_complete(
    corpus: &Corpus,
    progress: &ProgressDb,
    args: &cli::CompleteArgs,
) -> error::Result<()> {
    let lesson = corpus.get(&args.name).ok_or_else(|| Error::NotFound {
        kind: "lesson",
        name: args.name.clone(),
    })?;

    if progress.mark_complete(&lesson.id)? {
        progress.add_exercises(lesson.exercise_count() as u64)?;
        println!("✓ Completed lesson: {}", lesson.id);
    } else {
        println!("Lesson '{}' was already completed.", lesson.id);
    }

    let completed = progress.completed_lessons()?;
    let level = progress.current_level()?;
    if lesson.level == level && selector::level_complete(corpus, level, &completed)
    {
        println!("\nYou've completed every {level} lesson!");
        suggest_level_up(level);
    }
    Ok(())
}

fn cmd_level(progress: &ProgressDb, args: &cli::LevelArgs) -> error::Result<()> {
    let level: Level = args.level.parse()?;
    progress.set_level(level)?;
    println!("Level set to: {level}");
    Ok(())
}

fn cmd_search(
    corpus: &Corpus,
    progress: &ProgressDb,
    args: &cli::SearchArgs,
) -> error::Result<()> {
    // Reject a bad level before searching.
    let level = args
        .level
        .as_deref()
        .map(str::parse::<Level>)
        .transpose()?;

    let params = SearchParams::from_terms(args.keywords.as_slice())?
        .with_level(level)
        .with_limit(args.limit.map(NonZeroUsize::get));
    let results = search::execute_search(&params, corpus)?;

    if args.json {
        search::format_json(&results, &params)?;
    } else {
        let completed: BTreeSet<String> = progress.completed_lessons()?;
        search::format_human(&results, &params, &completed);
    }
    Ok(())
}
