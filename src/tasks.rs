//! Tasks and sequences.
//!
//! A [`Task`] is one pipeline stage. A sequence is an ordered slice of tasks
//! run strictly one after another; each task finishes writing its outputs
//! before the next starts, so a later stage always reads finished files.
//!
//! ```text
//! DEV    render → passthrough → css → js                       (then watch)
//! BUILD  render → passthrough → css → css minify → js → js minify
//! ```
//!
//! Failures become a [`Notification`]. With [`OnError::Halt`] the first
//! failure ends the sequence; with [`OnError::Continue`] the remaining tasks
//! still run.

use crate::css::{self, CssError, CssOutput};
use crate::js::{self, JsError, JsOutput};
use crate::output;
use crate::passthrough::{self, CopyReport, PassthroughError};
use crate::project::Project;
use crate::render::{self, RenderError, RenderedPage};
use std::fmt;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Task {
    RenderContent,
    CopyPassthrough,
    CompileCss,
    MinifyCss,
    CompileJs,
    MinifyJs,
}

impl Task {
    /// Stage name used in messages.
    pub fn stage(self) -> &'static str {
        match self {
            Task::RenderContent => "content",
            Task::CopyPassthrough => "passthrough",
            Task::CompileCss => "css",
            Task::MinifyCss => "css minify",
            Task::CompileJs => "js",
            Task::MinifyJs => "js minify",
        }
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.stage())
    }
}

/// Development sequence, followed by watching.
pub const DEV: &[Task] = &[
    Task::RenderContent,
    Task::CopyPassthrough,
    Task::CompileCss,
    Task::CompileJs,
];

/// Production sequence.
pub const BUILD: &[Task] = &[
    Task::RenderContent,
    Task::CopyPassthrough,
    Task::CompileCss,
    Task::MinifyCss,
    Task::CompileJs,
    Task::MinifyJs,
];

/// What a sequence does when a task fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnError {
    /// Stop at the first failure.
    Halt,
    /// Report and run the remaining tasks.
    Continue,
}

#[derive(Error, Debug)]
pub enum TaskError {
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error(transparent)]
    Passthrough(#[from] PassthroughError),
    #[error(transparent)]
    Css(#[from] CssError),
    #[error(transparent)]
    Js(#[from] JsError),
}

/// What a successful task produced.
#[derive(Debug)]
pub enum TaskReport {
    Rendered(Vec<RenderedPage>),
    Copied(CopyReport),
    Css(CssOutput),
    /// `None` when there was nothing to do.
    Js(Option<JsOutput>),
}

/// A user-facing failure message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub message: String,
}

impl Notification {
    pub fn failure(task: Task, error: &TaskError) -> Self {
        Self {
            title: format!("sitepipe error - {} failed", task.stage()),
            message: format!("Error: {error}"),
        }
    }
}

/// Outcome of a sequence run.
#[derive(Debug, Default)]
pub struct SequenceReport {
    pub completed: Vec<Task>,
    pub failed: Vec<(Task, Notification)>,
    /// Tasks not started because an earlier one failed under [`OnError::Halt`].
    pub skipped: Vec<Task>,
}

impl SequenceReport {
    pub fn is_ok(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Run one task to completion.
pub fn run_task(project: &Project, task: Task) -> Result<TaskReport, TaskError> {
    info!(stage = task.stage(), "running task");
    let report = match task {
        Task::RenderContent => {
            TaskReport::Rendered(render::render_site(project)?.into_result()?)
        }
        Task::CopyPassthrough => TaskReport::Copied(passthrough::copy_passthrough(project)?),
        Task::CompileCss => TaskReport::Css(css::compile(project)?),
        Task::MinifyCss => TaskReport::Css(css::minify(project)?),
        Task::CompileJs => TaskReport::Js(js::compile(project)?),
        Task::MinifyJs => TaskReport::Js(js::minify(project)?),
    };
    Ok(report)
}

/// Run `tasks` in order, printing a line per success and a notification per failure.
pub fn run_sequence(project: &Project, tasks: &[Task], on_error: OnError) -> SequenceReport {
    let mut report = SequenceReport::default();
    for (i, &task) in tasks.iter().enumerate() {
        match run_task(project, task) {
            Ok(task_report) => {
                output::print_task_success(task, &task_report, project);
                report.completed.push(task);
            }
            Err(error) => {
                output::print_task_failure(&error);
                let notification = Notification::failure(task, &error);
                output::print_notification(&notification);
                report.failed.push((task, notification));
                if on_error == OnError::Halt {
                    report.skipped.extend_from_slice(&tasks[i + 1..]);
                    break;
                }
            }
        }
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;
    use std::fs;

    #[test]
    fn sequences_have_expected_order() {
        assert_eq!(
            DEV,
            &[Task::RenderContent, Task::CopyPassthrough, Task::CompileCss, Task::CompileJs]
        );
        assert_eq!(BUILD.len(), 6);
        let pos = |t: Task| BUILD.iter().position(|&x| x == t).unwrap();
        assert!(pos(Task::CompileCss) < pos(Task::MinifyCss));
        assert!(pos(Task::CompileJs) < pos(Task::MinifyJs));
        assert_eq!(BUILD[0], Task::RenderContent);
    }

    #[test]
    fn failure_notification_format() {
        let error = TaskError::Css(CssError::Parse("unexpected token".to_string()));
        let notification = Notification::failure(Task::CompileCss, &error);
        assert_eq!(notification.title, "sitepipe error - css failed");
        assert_eq!(notification.message, "Error: parse error: unexpected token");
    }

    #[test]
    fn halt_stops_at_first_failure() {
        let tmp = setup_fixtures();
        fs::write(tmp.path().join("site/css/main.css"), "@tailwind nope;").unwrap();
        let project = load_project(tmp.path());

        let report = run_sequence(&project, BUILD, OnError::Halt);
        assert!(!report.is_ok());
        assert_eq!(report.completed, vec![Task::RenderContent, Task::CopyPassthrough]);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].0, Task::CompileCss);
        assert_eq!(
            report.skipped,
            vec![Task::MinifyCss, Task::CompileJs, Task::MinifyJs]
        );
        assert!(!project.js_output().exists());
    }

    #[test]
    fn continue_runs_remaining_tasks() {
        let tmp = setup_fixtures();
        fs::write(tmp.path().join("site/css/main.css"), "@tailwind nope;").unwrap();
        let project = load_project(tmp.path());

        let report = run_sequence(&project, DEV, OnError::Continue);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(
            report.completed,
            vec![Task::RenderContent, Task::CopyPassthrough, Task::CompileJs]
        );
        assert!(project.js_output().exists());
    }

    #[test]
    fn page_failures_fail_the_render_task() {
        let tmp = setup_fixtures();
        fs::write(tmp.path().join("site/broken.njk"), "{% endfor %}").unwrap();
        let project = load_project(tmp.path());

        let err = run_task(&project, Task::RenderContent).unwrap_err();
        assert!(matches!(err, TaskError::Render(RenderError::PagesFailed { .. })));
        assert!(project.output_dir().join("index.html").exists());
    }
}
