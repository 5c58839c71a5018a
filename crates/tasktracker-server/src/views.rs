use chrono::NaiveDate;
use minijinja::{context, Environment};
use serde::Serialize;
use tasktracker_core::form::{FormErrors, TaskForm};
use tasktracker_core::summary::{MonthlySummary, TaskBoard};
use tasktracker_core::task::Task;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("template error: {0}")]
    Render(#[from] minijinja::Error),
}

const TEMPLATES: &[(&str, &str)] = &[
    ("base.html", include_str!("../templates/base.html")),
    ("macros.html", include_str!("../templates/macros.html")),
    ("home.html", include_str!("../templates/home.html")),
    ("task_list.html", include_str!("../templates/task_list.html")),
    ("add_task.html", include_str!("../templates/add_task.html")),
    ("update_task.html", include_str!("../templates/update_task.html")),
    (
        "monthly_summary.html",
        include_str!("../templates/monthly_summary.html"),
    ),
    ("error.html", include_str!("../templates/error.html")),
];

/// One table row; carries the derived state label the templates show.
#[derive(Debug, Serialize)]
struct TaskRow<'a> {
    id: i64,
    title: &'a str,
    due_date: NaiveDate,
    state: &'static str,
    state_class: &'static str,
}

impl<'a> From<&'a Task> for TaskRow<'a> {
    fn from(task: &'a Task) -> Self {
        Self {
            id: task.id,
            title: &task.title,
            due_date: task.due_date,
            state: task.state().display_name(),
            state_class: task.state().as_str(),
        }
    }
}

fn rows(tasks: &[Task]) -> Vec<TaskRow<'_>> {
    tasks.iter().map(TaskRow::from).collect()
}

/// Embedded HTML templates. Autoescaping is on for `.html` names.
pub struct Views {
    env: Environment<'static>,
}

impl Views {
    pub fn new() -> Result<Self, TemplateError> {
        let mut env = Environment::new();
        for (name, source) in TEMPLATES {
            env.add_template(name, source)?;
        }
        Ok(Self { env })
    }

    pub fn render<S: Serialize>(&self, name: &str, ctx: S) -> Result<String, TemplateError> {
        Ok(self.env.get_template(name)?.render(ctx)?)
    }

    pub fn home(&self) -> Result<String, TemplateError> {
        self.render("home.html", context! {})
    }

    pub fn task_list(&self, board: &TaskBoard) -> Result<String, TemplateError> {
        self.render(
            "task_list.html",
            context! {
                board => context! {
                    today => board.today,
                    pending => rows(&board.pending),
                    carried_forward => rows(&board.carried_forward),
                },
            },
        )
    }

    pub fn add_task(&self, form: &TaskForm, errors: &FormErrors) -> Result<String, TemplateError> {
        self.render("add_task.html", context! { form, errors })
    }

    pub fn update_task(
        &self,
        task: &Task,
        form: &TaskForm,
        errors: &FormErrors,
    ) -> Result<String, TemplateError> {
        self.render(
            "update_task.html",
            context! {
                task => TaskRow::from(task),
                completed => form.is_completed(),
                form,
                errors,
            },
        )
    }

    pub fn monthly_summary(&self, summary: &MonthlySummary) -> Result<String, TemplateError> {
        self.render(
            "monthly_summary.html",
            context! {
                month_label => summary.month.label(),
                summary => context! {
                    month => summary.month,
                    completed => rows(&summary.completed),
                    carried_forward => rows(&summary.carried_forward),
                },
            },
        )
    }

    pub fn error_page(&self, status: &str, message: &str) -> Result<String, TemplateError> {
        self.render("error.html", context! { status, message })
    }
}
