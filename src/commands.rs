//! Command dispatch for the tutor-client binary.
//!
//! Every command first bootstraps a [`SessionManager`]; a bootstrap failure
//! ends the run before any command-specific work happens.

use std::io::Write;
use std::sync::Arc;

use tokio::io::AsyncReadExt;
use tracing::{debug, info};

use crate::api::{ExplainConceptRequest, TutorApi};
use crate::catalog;
use crate::cli::{Args, Command};
use crate::concepts;
use crate::config::Config;
use crate::error::TutorError;
use crate::insights::{self, Overview, ProgressView};
use crate::practice::{Evaluation, PracticeProblem};
use crate::session::{IdentityStore, SessionManager};
use crate::Result;

/// Bootstrap a session and run `args.command`, writing results to `out`.
pub async fn run(
    args: &Args,
    config: &Config,
    api: Arc<dyn TutorApi>,
    identity: Arc<dyn IdentityStore>,
    out: &mut dyn Write,
) -> Result<()> {
    let requested = args
        .student_id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty());

    // A requested student doubles as the fallback identity, so a first run
    // creates its one session for that student.
    let fallback = requested.unwrap_or(config.student.default_id.as_str()).to_string();
    let mut manager = SessionManager::new(api, identity).with_default_student(fallback);
    manager.bootstrap().await?;

    let student = requested.unwrap_or(manager.student_id()).to_string();
    let switching = student != manager.student_id();
    let fresh = manager.created_session() && !switching;

    if (args.command == Command::NewSession || switching) && !fresh {
        manager.create_session(&student).await?;
    }

    debug!(command = %args.command, "Dispatching command");

    match args.command {
        Command::Status | Command::NewSession => status(&manager, out),
        Command::Dashboard => {
            let overview = insights::load_overview(manager.api().as_ref(), manager.student_id()).await;
            render_overview(&overview, out)
        }
        Command::Progress => {
            let view = insights::load_progress(
                manager.api().as_ref(),
                manager.student_id(),
                manager.current_session(),
            )
            .await;
            render_progress(&view, out)
        }
        Command::Explain => explain(&manager, args, config, out).await,
        Command::Practice => practice(&manager, args, config, out).await,
        Command::Subjects => {
            for subject in catalog::load_subjects(manager.api().as_ref()).await {
                writeln!(out, "{}", subject)?;
            }
            Ok(())
        }
        Command::Topics => {
            let subject = args
                .subject
                .clone()
                .unwrap_or_else(|| config.practice.subject.clone());
            for topic in catalog::load_topics(manager.api().as_ref(), &subject).await {
                writeln!(out, "{}", topic)?;
            }
            Ok(())
        }
        Command::History => history(&manager, args, out).await,
        Command::Profile => profile(&manager, args, out).await,
    }
}

fn status(manager: &SessionManager, out: &mut dyn Write) -> Result<()> {
    let session = manager.current_session().ok_or(TutorError::NoActiveSession)?;
    writeln!(out, "Session:  {}", session.id)?;
    writeln!(out, "Student:  {}", manager.student_id())?;
    if let Some(ref created_at) = session.created_at {
        writeln!(out, "Created:  {}", created_at)?;
    }
    if let Some(ref status) = session.status {
        writeln!(out, "Status:   {}", status)?;
    }
    Ok(())
}

fn render_overview(overview: &Overview, out: &mut dyn Write) -> Result<()> {
    match overview.dashboard {
        Some(ref dashboard) => {
            let summary = &dashboard.summary;
            writeln!(out, "Active sessions: {}", summary.active_sessions)?;
            let mut scores: Vec<_> = summary.performance_summary.iter().collect();
            scores.sort_by(|a, b| a.0.cmp(b.0));
            for (subject, score) in scores {
                writeln!(out, "  {:<20} {:.2}", subject, score)?;
            }
            for action in &summary.recommended_actions {
                writeln!(out, "  * {}", action)?;
            }
        }
        None => writeln!(out, "Dashboard unavailable")?,
    }
    render_analytics(overview.analytics.as_ref(), out)
}

fn render_progress(view: &ProgressView, out: &mut dyn Write) -> Result<()> {
    render_analytics(view.analytics.as_ref(), out)?;
    match view.report {
        Some(ref report) => {
            if !report.summary.is_empty() {
                writeln!(out, "{}", report.summary)?;
            }
            for (label, items) in [
                ("Strengths", &report.strengths),
                ("Areas for improvement", &report.areas_for_improvement),
                ("Recommendations", &report.recommendations),
            ] {
                if items.is_empty() {
                    continue;
                }
                writeln!(out, "{}:", label)?;
                for item in items {
                    writeln!(out, "  - {}", item)?;
                }
            }
        }
        None => writeln!(out, "Progress report unavailable")?,
    }
    Ok(())
}

fn render_analytics(
    analytics: Option<&crate::api::StudentAnalytics>,
    out: &mut dyn Write,
) -> Result<()> {
    let Some(analytics) = analytics else {
        writeln!(out, "Analytics unavailable")?;
        return Ok(());
    };
    writeln!(out, "Sessions:        {}", analytics.total_sessions)?;
    writeln!(out, "Problems solved: {}", analytics.total_problems_solved)?;
    writeln!(out, "Average score:   {:.2}", analytics.average_score)?;
    writeln!(out, "Time learning:   {} min", analytics.time_spent_learning)?;
    if !analytics.subjects_studied.is_empty() {
        writeln!(out, "Subjects:        {}", analytics.subjects_studied.join(", "))?;
    }
    Ok(())
}

async fn explain(
    manager: &SessionManager,
    args: &Args,
    config: &Config,
    out: &mut dyn Write,
) -> Result<()> {
    let mut request = ExplainConceptRequest::new(
        args.subject.clone().unwrap_or_else(|| config.practice.subject.clone()),
        args.topic.clone().unwrap_or_else(|| config.practice.topic.clone()),
    );
    request.difficulty_level = args.difficulty.unwrap_or(config.practice.difficulty);
    if let Some(style) = args.style {
        request.learning_style = style;
    }

    let explanation =
        concepts::explain_concept(manager.api().as_ref(), manager.current_session(), &request).await?;
    writeln!(out, "{} / {}", request.subject, request.topic)?;
    writeln!(out)?;
    writeln!(out, "{}", explanation.explanation)?;
    Ok(())
}

async fn practice(
    manager: &SessionManager,
    args: &Args,
    config: &Config,
    out: &mut dyn Write,
) -> Result<()> {
    let mut workflow = manager.workflow();
    let request = args.problem_request(&config.default_problem_request());

    let Some(problem) = workflow.request(request).await? else {
        return Ok(());
    };
    render_problem(&problem, out)?;

    let solution = match args.solution {
        Some(ref solution) => solution.clone(),
        None => {
            writeln!(out, "Enter your solution, then end input (Ctrl-D):")?;
            out.flush()?;
            read_stdin().await?
        }
    };

    if let Some(evaluation) = workflow.submit(&solution).await? {
        render_evaluation(&evaluation, out)?;
        info!(state = ?workflow.state(), "Practice round finished");
    }
    Ok(())
}

async fn read_stdin() -> Result<String> {
    let mut buf = String::new();
    tokio::io::stdin().read_to_string(&mut buf).await?;
    Ok(buf)
}

fn render_problem(problem: &PracticeProblem, out: &mut dyn Write) -> Result<()> {
    writeln!(
        out,
        "[{}] {} / {} ({})",
        problem.problem_id, problem.subject, problem.topic, problem.difficulty
    )?;
    writeln!(out)?;
    writeln!(out, "{}", problem.question)?;
    writeln!(out)?;
    Ok(())
}

fn render_evaluation(evaluation: &Evaluation, out: &mut dyn Write) -> Result<()> {
    let verdict = if evaluation.is_correct {
        "Correct"
    } else {
        "Incorrect"
    };
    writeln!(
        out,
        "{} (score {:.0}%)",
        verdict,
        evaluation.performance_score * 100.0
    )?;
    if !evaluation.feedback.is_empty() {
        writeln!(out, "{}", evaluation.feedback)?;
    }
    Ok(())
}

async fn history(manager: &SessionManager, args: &Args, out: &mut dyn Write) -> Result<()> {
    let session = manager.current_session().ok_or(TutorError::NoActiveSession)?;
    let history = manager
        .api()
        .conversation_history(&session.id, args.limit)
        .await?;

    if history.messages.is_empty() {
        writeln!(out, "No messages in session {}", session.id)?;
        return Ok(());
    }
    for message in &history.messages {
        writeln!(out, "[{}] {}: {}", message.timestamp, message.role, message.content)?;
    }
    Ok(())
}

async fn profile(manager: &SessionManager, args: &Args, out: &mut dyn Write) -> Result<()> {
    let api = manager.api();
    let mut profile = api.user_profile(manager.student_id()).await?;

    if args.difficulty.is_some() || args.style.is_some() {
        let mut preferences = profile.learning_preferences.clone();
        if let Some(difficulty) = args.difficulty {
            preferences.default_difficulty = difficulty;
        }
        if let Some(style) = args.style {
            preferences.preferred_learning_style = style;
        }
        profile = api
            .update_user_profile(manager.student_id(), &preferences)
            .await?;
        info!(student = %manager.student_id(), "Learning preferences updated");
    }

    let preferences = &profile.learning_preferences;
    writeln!(out, "Student:        {}", profile.student_id)?;
    writeln!(out, "Sessions:       {}", profile.total_sessions)?;
    writeln!(out, "Difficulty:     {}", preferences.default_difficulty)?;
    writeln!(out, "Learning style: {}", preferences.preferred_learning_style)?;
    for badge in &profile.achievement_badges {
        writeln!(out, "  * {} ({})", badge.name, badge.earned_at)?;
    }
    Ok(())
}
