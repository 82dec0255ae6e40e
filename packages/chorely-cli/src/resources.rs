//! Resource subcommands: children, templates, bundles, assignments, tasks.

use crate::OutputFormat;
use anyhow::{Context, Result};
use chorely_core::api::{ApiClient, ApiOutcome};
use chorely_core::models::{
    BundleAssignmentUpdate, BundleTemplates, ChildUpdate, NewBundleAssignment, NewChild,
    NewTaskInstance, NewTaskTemplate, NewTemplateChild, RecurrenceType, TaskInstanceUpdate,
    TaskStatus, TaskTemplateUpdate, TemplateChildUpdate,
};
use clap::{Subcommand, ValueEnum};
use serde::Serialize;

#[derive(Subcommand)]
pub enum ChildCommand {
    /// List all children
    List,
    /// Show one child
    Get { id: String },
    /// Add a child profile
    Add {
        name: String,
        /// Display color
        #[arg(short, long, default_value = "#4F46E5")]
        color: String,
    },
    /// Rename or recolor a child
    Update {
        id: String,
        #[arg(short, long)]
        name: Option<String>,
        #[arg(short, long)]
        color: Option<String>,
    },
    /// Delete a child profile
    Delete { id: String },
}

#[derive(Clone, Copy, ValueEnum)]
pub enum Recurrence {
    Daily,
    Weekdays,
    CustomDays,
}

impl From<Recurrence> for RecurrenceType {
    fn from(value: Recurrence) -> Self {
        match value {
            Recurrence::Daily => RecurrenceType::Daily,
            Recurrence::Weekdays => RecurrenceType::Weekdays,
            Recurrence::CustomDays => RecurrenceType::CustomDays,
        }
    }
}

#[derive(Subcommand)]
pub enum TemplateCommand {
    /// List all task templates
    List,
    /// Show one task template
    Get { id: String },
    /// Create a recurring task template
    Add {
        name: String,
        #[arg(short, long)]
        description: Option<String>,
        #[arg(long)]
        category: Option<String>,
        #[arg(short, long)]
        priority: Option<i32>,
        /// First day of the recurrence (YYYY-MM-DD, default today)
        #[arg(short, long)]
        start_date: Option<String>,
        #[arg(short, long, default_value = "daily")]
        recurrence: Recurrence,
        /// Days for custom recurrence, e.g. MONDAY,THURSDAY
        #[arg(long, value_delimiter = ',')]
        days: Vec<String>,
    },
    /// Change fields of a task template
    Update {
        id: String,
        #[arg(short, long)]
        name: Option<String>,
        #[arg(short, long)]
        description: Option<String>,
        #[arg(long)]
        category: Option<String>,
        #[arg(short, long)]
        priority: Option<i32>,
        #[arg(short, long)]
        start_date: Option<String>,
        #[arg(short, long)]
        recurrence: Option<Recurrence>,
        #[arg(long, value_delimiter = ',')]
        days: Option<Vec<String>>,
    },
    /// Delete a task template
    Delete { id: String },
}

#[derive(Subcommand)]
pub enum BundleCommand {
    /// List all bundles
    List,
    /// Show one bundle
    Get { id: String },
    /// Create a bundle from template ids
    Add {
        #[arg(required = true)]
        template_ids: Vec<String>,
    },
    /// Replace the templates of a bundle
    Update {
        id: String,
        #[arg(required = true)]
        template_ids: Vec<String>,
    },
    /// Delete a bundle
    Delete { id: String },
}

#[derive(Subcommand)]
pub enum AssignmentCommand {
    /// List bundle assignments
    List,
    /// Show one bundle assignment
    Get { id: String },
    /// Assign a bundle to children
    Add {
        bundle_id: String,
        #[arg(required = true)]
        child_ids: Vec<String>,
    },
    /// Change the children of an assignment
    Update {
        id: String,
        #[arg(short, long)]
        bundle: Option<String>,
        child_ids: Vec<String>,
    },
    /// Remove a bundle assignment
    Delete { id: String },
}

#[derive(Subcommand)]
pub enum TemplateChildCommand {
    /// List template assignments
    List,
    /// Show one template assignment
    Get { id: String },
    /// Assign a template to a child
    Add { template_id: String, child_id: String },
    /// Change a template assignment
    Update {
        id: String,
        #[arg(short, long)]
        template: Option<String>,
        #[arg(short, long)]
        child: Option<String>,
    },
    /// Remove a template assignment
    Delete { id: String },
}

#[derive(Clone, Copy, ValueEnum)]
pub enum Status {
    Pending,
    Completed,
    Skipped,
}

impl From<Status> for TaskStatus {
    fn from(value: Status) -> Self {
        match value {
            Status::Pending => TaskStatus::Pending,
            Status::Completed => TaskStatus::Completed,
            Status::Skipped => TaskStatus::Skipped,
        }
    }
}

#[derive(Subcommand)]
pub enum TaskCommand {
    /// List task instances
    List {
        /// Only tasks on this day (YYYY-MM-DD)
        #[arg(short, long)]
        date: Option<String>,
        /// Only tasks of this child
        #[arg(short, long)]
        child: Option<String>,
    },
    /// Show one task instance
    Get { id: String },
    /// Create a task instance
    Add {
        template_id: String,
        child_id: String,
        /// Day of the task (YYYY-MM-DD, default today)
        #[arg(short, long)]
        date: Option<String>,
        #[arg(short, long)]
        status: Option<Status>,
        #[arg(short, long)]
        notes: Option<String>,
    },
    /// Change status or notes of a task instance
    Update {
        id: String,
        #[arg(short, long)]
        status: Option<Status>,
        #[arg(short, long)]
        notes: Option<String>,
    },
    /// Delete a task instance
    Delete { id: String },
    /// Show every child with their tasks
    ByChildren,
    /// Toggle completion of a task instance
    ToggleStatus { id: String },
}

fn today() -> String {
    chrono::Local::now().format("%Y-%m-%d").to_string()
}

/// Unwrap an outcome; the navigation hook already told the user to sign in.
fn require_session<T>(outcome: ApiOutcome<T>) -> Result<T> {
    match outcome {
        ApiOutcome::Ok(value) => Ok(value),
        ApiOutcome::SessionExpired => Err(anyhow::anyhow!("Not signed in")),
    }
}

fn emit<T: Serialize>(format: OutputFormat, value: &T, text: impl FnOnce(&T)) -> Result<()> {
    match format {
        OutputFormat::Text => text(value),
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(value).context("Failed to render JSON")?;
            println!("{}", json);
        }
    }
    Ok(())
}

fn or_dash(value: Option<&str>) -> &str {
    value.filter(|v| !v.is_empty()).unwrap_or("-")
}

pub async fn run_children(format: OutputFormat, client: &ApiClient, cmd: &ChildCommand) -> Result<()> {
    match cmd {
        ChildCommand::List => {
            let resp = require_session(client.list_children(None).await?)?;
            emit(format, &resp.data, |children| {
                if children.is_empty() {
                    println!("No children yet. Add one with: chorely children add <name>");
                }
                for child in children {
                    println!("  {:24} {:10} {}", child.id, child.color, child.name);
                }
            })
        }
        ChildCommand::Get { id } => {
            let resp = require_session(client.get_child(id, None).await?)?;
            emit(format, &resp.data, |child| {
                println!("Id:      {}", child.id);
                println!("Name:    {}", child.name);
                println!("Color:   {}", child.color);
                println!("Created: {}", child.created_at.to_rfc3339());
            })
        }
        ChildCommand::Add { name, color } => {
            let child = NewChild {
                name: name.clone(),
                color: color.clone(),
            };
            let resp = require_session(client.add_child(&child, None).await?)?;
            emit(format, &resp.data, |child| {
                println!("Added {} ({})", child.name, child.id);
            })
        }
        ChildCommand::Update { id, name, color } => {
            let update = ChildUpdate {
                name: name.clone(),
                color: color.clone(),
            };
            let resp = require_session(client.update_child(id, &update, None).await?)?;
            emit(format, &resp.data, |child| {
                println!("Updated {} ({})", child.name, child.id);
            })
        }
        ChildCommand::Delete { id } => {
            let resp = require_session(client.delete_child(id, None).await?)?;
            emit(format, &resp, |_| println!("Deleted child {}", id))
        }
    }
}

pub async fn run_templates(
    format: OutputFormat,
    client: &ApiClient,
    cmd: &TemplateCommand,
) -> Result<()> {
    match cmd {
        TemplateCommand::List => {
            let resp = require_session(client.list_task_templates(None).await?)?;
            emit(format, &resp.data, |templates| {
                for t in templates {
                    println!(
                        "  {:24} {:12} {:10} {}",
                        t.id,
                        format!("{:?}", t.recurrence_type),
                        or_dash(t.category.as_deref()),
                        t.name
                    );
                }
            })
        }
        TemplateCommand::Get { id } => {
            let resp = require_session(client.get_task_template(id, None).await?)?;
            emit(format, &resp.data, |t| {
                println!("Id:          {}", t.id);
                println!("Name:        {}", t.name);
                println!("Description: {}", or_dash(t.description.as_deref()));
                println!("Category:    {}", or_dash(t.category.as_deref()));
                println!("Priority:    {}", t.priority.map(|p| p.to_string()).unwrap_or_else(|| "-".into()));
                println!("Starts:      {}", t.start_date);
                println!("Recurrence:  {:?} {}", t.recurrence_type, t.recurrence_days.join(","));
            })
        }
        TemplateCommand::Add {
            name,
            description,
            category,
            priority,
            start_date,
            recurrence,
            days,
        } => {
            let recurrence_type = RecurrenceType::from(*recurrence);
            if recurrence_type == RecurrenceType::CustomDays && days.is_empty() {
                anyhow::bail!("Custom recurrence needs --days");
            }
            let template = NewTaskTemplate {
                name: name.clone(),
                description: description.clone(),
                category: category.clone(),
                priority: *priority,
                start_date: start_date.clone().unwrap_or_else(today),
                recurrence_type,
                recurrence_days: (!days.is_empty()).then(|| days.clone()),
            };
            let resp = require_session(client.add_task_template(&template, None).await?)?;
            emit(format, &resp.data, |t| println!("Added template {} ({})", t.name, t.id))
        }
        TemplateCommand::Update {
            id,
            name,
            description,
            category,
            priority,
            start_date,
            recurrence,
            days,
        } => {
            let update = TaskTemplateUpdate {
                name: name.clone(),
                description: description.clone(),
                category: category.clone(),
                priority: *priority,
                start_date: start_date.clone(),
                recurrence_type: recurrence.map(RecurrenceType::from),
                recurrence_days: days.clone(),
            };
            let resp = require_session(client.update_task_template(id, &update, None).await?)?;
            emit(format, &resp.data, |t| println!("Updated template {} ({})", t.name, t.id))
        }
        TemplateCommand::Delete { id } => {
            let resp = require_session(client.delete_task_template(id, None).await?)?;
            emit(format, &resp, |_| println!("Deleted template {}", id))
        }
    }
}

pub async fn run_bundles(format: OutputFormat, client: &ApiClient, cmd: &BundleCommand) -> Result<()> {
    let print_bundle = |b: &chorely_core::models::ChildTaskBundle| {
        let names: Vec<&str> = b.templates.iter().map(|t| t.name.as_str()).collect();
        println!("  {:24} {}", b.id, names.join(", "));
    };

    match cmd {
        BundleCommand::List => {
            let resp = require_session(client.list_task_bundles(None).await?)?;
            emit(format, &resp.data, |bundles| bundles.iter().for_each(print_bundle))
        }
        BundleCommand::Get { id } => {
            let resp = require_session(client.get_task_bundle(id, None).await?)?;
            emit(format, &resp.data, print_bundle)
        }
        BundleCommand::Add { template_ids } => {
            let body = BundleTemplates {
                template_ids: template_ids.clone(),
            };
            let resp = require_session(client.add_task_bundle(&body, None).await?)?;
            emit(format, &resp.data, |b| println!("Added bundle {}", b.id))
        }
        BundleCommand::Update { id, template_ids } => {
            let body = BundleTemplates {
                template_ids: template_ids.clone(),
            };
            let resp = require_session(client.update_task_bundle(id, &body, None).await?)?;
            emit(format, &resp.data, |b| println!("Updated bundle {}", b.id))
        }
        BundleCommand::Delete { id } => {
            let resp = require_session(client.delete_task_bundle(id, None).await?)?;
            emit(format, &resp, |_| println!("Deleted bundle {}", id))
        }
    }
}

pub async fn run_assignments(
    format: OutputFormat,
    client: &ApiClient,
    cmd: &AssignmentCommand,
) -> Result<()> {
    let print_assignment = |a: &chorely_core::models::ChildBundleAssignment| {
        let names: Vec<&str> = a.children.iter().map(|c| c.name.as_str()).collect();
        println!("  {:24} bundle {:24} {}", a.id, a.bundle_id, names.join(", "));
    };

    match cmd {
        AssignmentCommand::List => {
            let resp = require_session(client.list_bundle_assignments(None).await?)?;
            emit(format, &resp.data, |list| list.iter().for_each(print_assignment))
        }
        AssignmentCommand::Get { id } => {
            let resp = require_session(client.get_bundle_assignment(id, None).await?)?;
            emit(format, &resp.data, print_assignment)
        }
        AssignmentCommand::Add { bundle_id, child_ids } => {
            let body = NewBundleAssignment {
                bundle_id: bundle_id.clone(),
                child_ids: child_ids.clone(),
            };
            let resp = require_session(client.add_bundle_assignment(&body, None).await?)?;
            emit(format, &resp.data, |a| println!("Assigned bundle {} ({})", a.bundle_id, a.id))
        }
        AssignmentCommand::Update {
            id,
            bundle,
            child_ids,
        } => {
            let body = BundleAssignmentUpdate {
                bundle_id: bundle.clone(),
                child_ids: child_ids.clone(),
            };
            let resp = require_session(client.update_bundle_assignment(id, &body, None).await?)?;
            emit(format, &resp.data, |a| println!("Updated assignment {}", a.id))
        }
        AssignmentCommand::Delete { id } => {
            let resp = require_session(client.delete_bundle_assignment(id, None).await?)?;
            emit(format, &resp, |_| println!("Deleted assignment {}", id))
        }
    }
}

pub async fn run_template_children(
    format: OutputFormat,
    client: &ApiClient,
    cmd: &TemplateChildCommand,
) -> Result<()> {
    let print_link = |l: &chorely_core::models::TemplateChild| {
        let template = l.template.as_ref().map(|t| t.name.as_str()).unwrap_or(&l.template_id);
        let child = l.child.as_ref().map(|c| c.name.as_str()).unwrap_or(&l.child_id);
        println!("  {:24} {} -> {}", l.id, template, child);
    };

    match cmd {
        TemplateChildCommand::List => {
            let resp = require_session(client.list_template_children(None).await?)?;
            emit(format, &resp.data, |list| list.iter().for_each(print_link))
        }
        TemplateChildCommand::Get { id } => {
            let resp = require_session(client.get_template_child(id, None).await?)?;
            emit(format, &resp.data, print_link)
        }
        TemplateChildCommand::Add {
            template_id,
            child_id,
        } => {
            let body = NewTemplateChild {
                template_id: template_id.clone(),
                child_id: child_id.clone(),
            };
            let resp = require_session(client.add_template_child(&body, None).await?)?;
            emit(format, &resp.data, |l| println!("Assigned template ({})", l.id))
        }
        TemplateChildCommand::Update {
            id,
            template,
            child,
        } => {
            let body = TemplateChildUpdate {
                template_id: template.clone(),
                child_id: child.clone(),
            };
            let resp = require_session(client.update_template_child(id, &body, None).await?)?;
            emit(format, &resp.data, |l| println!("Updated template assignment {}", l.id))
        }
        TemplateChildCommand::Delete { id } => {
            let resp = require_session(client.delete_template_child(id, None).await?)?;
            emit(format, &resp, |_| println!("Deleted template assignment {}", id))
        }
    }
}

pub async fn run_tasks(format: OutputFormat, client: &ApiClient, cmd: &TaskCommand) -> Result<()> {
    let print_task = |t: &chorely_core::models::TaskInstance| {
        let name = t.template.as_ref().map(|x| x.name.as_str()).unwrap_or(&t.template_id);
        let child = t.child.as_ref().map(|c| c.name.as_str()).unwrap_or(&t.child_id);
        println!("  {:24} {:10} {:10} {:16} {}", t.id, t.date, t.status, child, name);
    };

    match cmd {
        TaskCommand::List { date, child } => {
            let mut filters: Vec<(&str, &str)> = Vec::new();
            if let Some(date) = date {
                filters.push(("date", date.as_str()));
            }
            if let Some(child) = child {
                filters.push(("childId", child.as_str()));
            }
            let resp = require_session(client.list_task_instances(&filters, None).await?)?;
            emit(format, &resp.data, |tasks| tasks.iter().for_each(print_task))
        }
        TaskCommand::Get { id } => {
            let resp = require_session(client.get_task_instance(id, None).await?)?;
            emit(format, &resp.data, |t| {
                print_task(t);
                if let Some(notes) = t.notes.as_deref().filter(|n| !n.is_empty()) {
                    println!("  notes: {}", notes);
                }
            })
        }
        TaskCommand::Add {
            template_id,
            child_id,
            date,
            status,
            notes,
        } => {
            let task = NewTaskInstance {
                template_id: template_id.clone(),
                child_id: child_id.clone(),
                date: date.clone().unwrap_or_else(today),
                status: status.map(TaskStatus::from),
                notes: notes.clone(),
            };
            let resp = require_session(client.add_task_instance(&task, None).await?)?;
            emit(format, &resp.data, |t| println!("Added task {} for {}", t.id, t.date))
        }
        TaskCommand::Update { id, status, notes } => {
            let update = TaskInstanceUpdate {
                status: status.map(TaskStatus::from),
                notes: notes.clone(),
            };
            let resp = require_session(client.update_task_instance(id, &update, None).await?)?;
            emit(format, &resp.data, |t| println!("Task {} is {}", t.id, t.status))
        }
        TaskCommand::Delete { id } => {
            let resp = require_session(client.delete_task_instance(id, None).await?)?;
            emit(format, &resp, |_| println!("Deleted task {}", id))
        }
        TaskCommand::ByChildren => {
            let resp = require_session(client.task_instances_by_children(None).await?)?;
            emit(format, &resp.data, |groups| {
                for group in groups {
                    let done = group
                        .tasks
                        .iter()
                        .filter(|t| t.status == TaskStatus::Completed)
                        .count();
                    println!("{} ({}/{} done)", group.name, done, group.tasks.len());
                    for task in &group.tasks {
                        let mark = match task.status {
                            TaskStatus::Completed => "x",
                            TaskStatus::Skipped => "-",
                            TaskStatus::Pending => " ",
                        };
                        println!("  [{}] {:24} {} {}", mark, task.id, task.date, task.template_name);
                    }
                }
            })
        }
        TaskCommand::ToggleStatus { id } => {
            let resp = require_session(client.update_task_instance_status(id, None).await?)?;
            emit(format, &resp.data, |t| println!("Task {} is now {}", t.id, t.status))
        }
    }
}
