//! Journey CLI - command-line interface over a learner session

use clap::Subcommand;

use study_journey::catalog::{Assessment, FlowKind};
use study_journey::flow::Screen;
use study_journey::{Answers, Journey, JourneyError, ModuleState, Result, SubmissionReport};

#[derive(Debug, Subcommand)]
pub enum JourneyCommands {
    /// List modules with their lock and completion status
    Modules,

    /// Show rank, knowledge points and the next module
    Status,

    /// Print a module's lessons followed by its assessment
    Study {
        /// Module index
        index: usize,
    },

    /// Submit a module's assessment
    Submit {
        /// Module index
        index: usize,

        /// Comma-separated answers: option numbers for quizzes, y/n per
        /// checklist item
        #[arg(short, long)]
        answers: Option<String>,

        /// Acknowledge every checklist item / confirm a generic module
        #[arg(long)]
        ack: bool,
    },

    /// Print the stored completion set
    Export,
}

pub fn execute_command(journey: &mut Journey, cmd: JourneyCommands) -> Result<String> {
    match cmd {
        JourneyCommands::Modules => Ok(format_modules(journey)),

        JourneyCommands::Status => Ok(format_status(journey)),

        JourneyCommands::Study { index } => {
            journey.select(index)?;
            let mut output = String::new();

            if journey.module_state(index) == Some(ModuleState::Completed) {
                if let Some(module) = journey.active_module() {
                    output.push_str("(review - module already complete)\n\n");
                    let of = module.lessons.len();
                    for (i, lesson) in module.lessons.iter().enumerate() {
                        output.push_str(&format_screen(&Screen::Lesson { lesson, position: i + 1, of }));
                        output.push('\n');
                    }
                }
            }

            loop {
                if let Some(screen) = journey.screen() {
                    output.push_str(&format_screen(&screen));
                    output.push('\n');
                }
                match journey.module_state(index) {
                    Some(ModuleState::InProgress) => {
                        journey.next_lesson()?;
                    }
                    _ => break,
                }
            }

            Ok(output)
        }

        JourneyCommands::Submit { index, answers, ack } => {
            journey.select(index)?;
            if journey.module_state(index) == Some(ModuleState::Completed) {
                return Ok(format!("Module {} is already complete", index));
            }
            journey.begin_assessment()?;

            let module = journey
                .active_module()
                .ok_or(JourneyError::UnknownModule { index, len: journey.catalog().len() })?;
            let answers = build_answers(module.flow, &module.assessment, answers.as_deref(), ack)?;

            let report = journey.submit(&answers)?;
            Ok(format_report(journey, &report))
        }

        JourneyCommands::Export => journey.store().completed().to_json(),
    }
}

/// Turn CLI input into answers for a module's assessment
pub fn build_answers(flow: FlowKind, assessment: &Assessment, raw: Option<&str>, ack: bool) -> Result<Answers> {
    match (flow, assessment) {
        (FlowKind::Quiz, Assessment::Quiz { .. }) => {
            let raw = raw.ok_or_else(|| JourneyError::InvalidAnswers("quiz needs --answers".into()))?;
            let chosen = split(raw)
                .map(|s| {
                    // Option numbers on the command line are 1-based
                    match s.parse::<usize>() {
                        Ok(n) if n >= 1 => Ok(n - 1),
                        _ => Err(JourneyError::InvalidAnswers(format!("'{}' is not an option number", s))),
                    }
                })
                .collect::<Result<Vec<_>>>()?;
            Ok(Answers::Quiz(chosen))
        }
        (FlowKind::Checklist, Assessment::Checklist { items }) => {
            if ack {
                return Ok(Answers::Checklist(vec![true; items.len()]));
            }
            let raw = raw.ok_or_else(|| JourneyError::InvalidAnswers("checklist needs --answers or --ack".into()))?;
            let flags = split(raw)
                .map(|s| match s.to_ascii_lowercase().as_str() {
                    "y" | "yes" | "1" | "true" => Ok(true),
                    "n" | "no" | "0" | "false" => Ok(false),
                    other => Err(JourneyError::InvalidAnswers(format!("'{}' is not y/n", other))),
                })
                .collect::<Result<Vec<_>>>()?;
            Ok(Answers::Checklist(flags))
        }
        _ if ack => Ok(Answers::Acknowledge),
        _ => Err(JourneyError::InvalidAnswers("generic module needs --ack".into())),
    }
}

fn split(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(',').map(str::trim).filter(|s| !s.is_empty())
}

fn format_modules(journey: &Journey) -> String {
    let mut output = String::new();
    output.push_str("Modules\n");
    output.push_str("=======\n\n");

    for (i, module) in journey.catalog().modules().iter().enumerate() {
        let marker = if journey.is_complete(i) {
            "DONE"
        } else if journey.is_unlocked(i) {
            "OPEN"
        } else {
            "LOCK"
        };
        output.push_str(&format!(
            "[{}] {}. {} ({} lessons, {} KP, {})\n",
            marker,
            i,
            module.title,
            module.lessons_count,
            module.points_value,
            module.flow
        ));
    }

    output
}

fn format_status(journey: &Journey) -> String {
    let p = journey.projection();
    let mut output = String::new();
    output.push_str(&format!("Rank:      {}\n", p.rank_name));
    output.push_str(&format!("Points:    {} / {} KP\n", p.total_points, p.total_available));
    output.push_str(&format!(
        "Completed: {} of {} ({}%)\n",
        p.completed_count,
        journey.catalog().len(),
        p.percent_complete
    ));

    match journey.next_open_module().and_then(|i| journey.catalog().get(i).map(|m| (i, m))) {
        Some((i, module)) => output.push_str(&format!("Next:      {}. {}\n", i, module.title)),
        None if journey.is_catalog_finished() => output.push_str("Next:      journey complete\n"),
        None => output.push_str("Next:      none available\n"),
    }

    output
}

fn format_screen(screen: &Screen<'_>) -> String {
    match screen {
        Screen::Overview { module } => format!("{}\n{}\n", module.title, module.description),
        Screen::Lesson { lesson, position, of } => format!(
            "Lesson {}/{}: {}\nFocus: {}\nScripture: {}\n\n{}\n\n{}\n",
            position, of, lesson.title, lesson.focus, lesson.scripture, lesson.summary, lesson.content
        ),
        Screen::Quiz { questions } => {
            let mut output = String::from("Quiz\n----\n");
            for (n, q) in questions.iter().enumerate() {
                output.push_str(&format!("{}. {}\n", n + 1, q.prompt));
                for (o, option) in q.options.iter().enumerate() {
                    output.push_str(&format!("   {}) {}\n", o + 1, option));
                }
            }
            output
        }
        Screen::Checklist { items } => {
            let mut output = String::from("Checklist\n---------\n");
            for item in items.iter() {
                output.push_str(&format!("[ ] {}\n", item));
            }
            output
        }
        Screen::Acknowledge { title } => format!("Confirm you have finished {}\n", title),
        Screen::Completed { title, points } => format!("{} complete (+{} KP)\n", title, points),
    }
}

fn format_report(journey: &Journey, report: &SubmissionReport) -> String {
    let o = &report.outcome;
    let mut output = String::new();

    if o.passed {
        output.push_str(&format!("PASSED: {}/{} ({}%)\n", o.correct, o.total, o.percent));
    } else {
        output.push_str(&format!(
            "NOT PASSED: {}/{} ({}%) - review the lessons and try again\n",
            o.correct, o.total, o.percent
        ));
    }

    if let Some(next) = report.advanced_to.and_then(|i| journey.catalog().get(i)) {
        output.push_str(&format!("Unlocked: {}\n", next.title));
    }

    if report.catalog_finished {
        let p = journey.projection();
        output.push_str(&format!(
            "\nJourney complete! Rank {} with {} KP\n",
            p.rank_name, p.total_points
        ));
    }

    output
}
