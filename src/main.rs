use std::io::BufRead;

use anyhow::{anyhow, bail, Context};
use clap::{Parser, Subcommand};

mod api;
mod feedback;
mod filter;
mod models;
mod render;
mod session;

use api::ApiClient;
use feedback::FeedbackForm;
use filter::{ReportFilter, CONFIDENCE_THRESHOLDS};
use models::{Role, Section, Session, SECTIONS};
use session::{Route, SessionStore};

#[derive(Parser)]
#[command(name = "report-console")]
#[command(about = "Terminal console for the report review API", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in with an email and persist the issued session
    Login {
        #[arg(long)]
        email: String,
    },
    /// Clear the persisted session
    Logout,
    /// List reports, optionally filtered
    Reports {
        #[arg(long)]
        report_type: Option<String>,
        #[arg(long)]
        industry: Option<String>,
        #[arg(long, value_parser = parse_confidence)]
        min_confidence: Option<i32>,
    },
    /// Show one report in full, with its sources
    Show {
        #[arg(long)]
        report: String,
    },
    /// Submit section feedback for a report; with no --on pairs the form
    /// opens interactively
    Feedback {
        #[arg(long)]
        report: String,
        /// <section>=<comment> pair, repeatable
        #[arg(long = "on", value_name = "SECTION=COMMENT")]
        pairs: Vec<String>,
    },
    /// List submitted feedback for a report (reviewers)
    ListFeedback {
        #[arg(long)]
        report: String,
    },
    /// Assign a role to a user (admins)
    AddUser {
        #[arg(long)]
        email: String,
        #[arg(long)]
        role: Role,
    },
}

fn parse_confidence(value: &str) -> Result<i32, String> {
    let parsed: i32 = value
        .parse()
        .map_err(|_| "confidence threshold must be a number".to_string())?;
    if CONFIDENCE_THRESHOLDS.contains(&parsed) {
        Ok(parsed)
    } else {
        Err("confidence threshold must be one of 70, 80, 90".to_string())
    }
}

fn section_names() -> String {
    SECTIONS
        .iter()
        .map(|s| s.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Maps the guard decision to either access or a redirect-style error.
fn authorize(requested: Route, session: Option<&Session>) -> anyhow::Result<&Session> {
    let resolved = session::resolve(requested, session);
    match session {
        Some(session) if resolved == requested => Ok(session),
        _ if resolved == Route::Login => {
            bail!("not logged in; run `report-console login` first")
        }
        _ => bail!(
            "this account cannot open {}; redirected to {}",
            requested.path(),
            resolved.path()
        ),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let base_url = std::env::var("REPORT_API_BASE_URL")
        .context("REPORT_API_BASE_URL must be set to the report API endpoint")?;
    let store = SessionStore::new(&session::default_store_dir()?);
    let current = store.load()?;

    match cli.command {
        Commands::Login { email } => {
            if let Some(session) = &current {
                println!(
                    "Already logged in as {} ({}); redirected to {}.",
                    session.email,
                    session.role.as_str(),
                    Route::Reports.path()
                );
                return Ok(());
            }
            let client = ApiClient::new(&base_url, None);
            let issued = client.login(&email).await?;
            let session = Session {
                token: issued.token,
                role: issued.role,
                email,
            };
            store.login(&session)?;
            println!(
                "Logged in as {} ({}); continue at {}.",
                session.email,
                session.role.as_str(),
                session::landing_route(session.role).path()
            );
        }
        Commands::Logout => {
            if store.logout()? {
                println!("Logged out; session cleared.");
            } else {
                println!("No active session.");
            }
        }
        Commands::Reports {
            report_type,
            industry,
            min_confidence,
        } => {
            let session = authorize(Route::Reports, current.as_ref())?;
            let client = ApiClient::new(&base_url, Some(session.token.clone()));
            let reports = client.reports().await?;
            let filter = ReportFilter {
                report_type,
                industry,
                min_confidence,
            };
            let filtered = filter.apply(&reports);
            print!("{}", render::build_report_list(&filtered));
            if filtered.is_empty() && !reports.is_empty() {
                println!(
                    "Types available: {}",
                    filter::distinct_values(&reports, |r| &r.report_type).join(", ")
                );
                println!(
                    "Industries available: {}",
                    filter::distinct_values(&reports, |r| &r.industry).join(", ")
                );
            }
        }
        Commands::Show { report } => {
            let session = authorize(Route::Reports, current.as_ref())?;
            let client = ApiClient::new(&base_url, Some(session.token.clone()));
            let reports = client.reports().await?;
            let found = reports
                .iter()
                .find(|r| r.id == report)
                .ok_or_else(|| anyhow!("no report with id '{report}'"))?;
            let feedbacks = if session.role == Role::Reviewer {
                Some(client.feedback(&report).await?)
            } else {
                None
            };
            print!(
                "{}",
                render::build_report_detail(found, session.role, feedbacks.as_deref())
            );
        }
        Commands::Feedback { report, pairs } => {
            let session = authorize(Route::Reports, current.as_ref())?;
            let client = ApiClient::new(&base_url, Some(session.token.clone()));
            if pairs.is_empty() {
                interactive_feedback(&client, &report, session.role).await?;
            } else {
                let mut form = FeedbackForm::new();
                let mut target = form.entries()[0].id;
                for (position, raw) in pairs.iter().enumerate() {
                    if position > 0 {
                        target = form.add_entry()?;
                    }
                    let (section, comment) = parse_pair(raw)?;
                    form.set_section(target, Some(section))?;
                    form.set_comment(target, &comment)?;
                }
                submit_form(&client, &report, &mut form, session.role).await?;
            }
        }
        Commands::ListFeedback { report } => {
            let session = authorize(Route::Reports, current.as_ref())?;
            if session.role != Role::Reviewer {
                bail!("only reviewers can view submitted feedback");
            }
            let client = ApiClient::new(&base_url, Some(session.token.clone()));
            let feedbacks = client.feedback(&report).await?;
            print!("{}", render::build_feedback_list(&feedbacks));
        }
        Commands::AddUser { email, role } => {
            let session = authorize(Route::Admin, current.as_ref())?;
            if role == Role::Admin {
                bail!("role must be viewer or reviewer");
            }
            let client = ApiClient::new(&base_url, Some(session.token.clone()));
            client.add_user(&email, role).await?;
            println!("Role '{}' assigned to {email}.", role.as_str());
        }
    }

    Ok(())
}

fn parse_pair(raw: &str) -> anyhow::Result<(Section, String)> {
    let Some((name, comment)) = raw.split_once('=') else {
        bail!("--on takes <section>=<comment>, got '{raw}'");
    };
    let Some(section) = Section::parse(name.trim()) else {
        bail!(
            "unknown section '{}' (expected one of {})",
            name.trim(),
            section_names()
        );
    };
    Ok((section, comment.to_string()))
}

/// Validates locally, posts the feedback, resets the form, and re-fetches
/// the feedback list for reviewers. A failed request leaves the form as-is.
async fn submit_form(
    client: &ApiClient,
    report_id: &str,
    form: &mut FeedbackForm,
    role: Role,
) -> anyhow::Result<()> {
    let payload = form.payload()?;
    client.submit_feedback(report_id, &payload).await?;
    form.reset();
    println!("Feedback submitted.");
    if role == Role::Reviewer {
        let feedbacks = client.feedback(report_id).await?;
        print!("{}", render::build_feedback_list(&feedbacks));
    }
    Ok(())
}

fn print_form(form: &FeedbackForm) {
    for (position, entry) in form.entries().iter().enumerate() {
        let section = entry.section.map(|s| s.as_str()).unwrap_or("(none)");
        let options = form
            .selectable_sections(entry.id)
            .iter()
            .map(|s| s.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        println!(
            "{}. section: {section}  comment: {:?}  (options: {options})",
            position + 1,
            entry.comment
        );
    }
}

/// Resolves a 1-based entry position from user input to its stable id.
fn entry_id_at(form: &FeedbackForm, input: &str) -> anyhow::Result<u64> {
    let position: usize = input
        .trim()
        .parse()
        .map_err(|_| anyhow!("expected an entry number, got '{}'", input.trim()))?;
    form.entries()
        .get(position.checked_sub(1).unwrap_or(usize::MAX))
        .map(|e| e.id)
        .ok_or_else(|| anyhow!("no entry {position}"))
}

/// Line-oriented rendition of the feedback form. Quitting or EOF discards
/// any in-progress entries, like closing the detail overlay.
async fn interactive_feedback(
    client: &ApiClient,
    report_id: &str,
    role: Role,
) -> anyhow::Result<()> {
    let mut form = FeedbackForm::new();
    println!("Feedback for report {report_id}.");
    println!("Commands: add | remove <n> | section <n> <name> | comment <n> <text> | show | submit | quit");
    print_form(&form);

    let stdin = std::io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;
        let input = line.trim();
        let (command, rest) = input.split_once(' ').unwrap_or((input, ""));

        let outcome: anyhow::Result<()> = match command {
            "" => Ok(()),
            "add" => form.add_entry().map(|_| ()),
            "remove" => entry_id_at(&form, rest).map(|id| {
                if !form.remove_entry(id) {
                    println!("The last entry cannot be removed.");
                }
            }),
            "section" => match rest.split_once(' ') {
                None => Err(anyhow!("usage: section <n> <name>")),
                Some((index, name)) => {
                    let section = match name.trim() {
                        "-" => Ok(None),
                        value => Section::parse(value).map(Some).ok_or_else(|| {
                            anyhow!(
                                "unknown section '{value}' (expected one of {})",
                                section_names()
                            )
                        }),
                    };
                    section.and_then(|section| {
                        entry_id_at(&form, index).and_then(|id| form.set_section(id, section))
                    })
                }
            },
            "comment" => match rest.split_once(' ') {
                None => Err(anyhow!("usage: comment <n> <text>")),
                Some((index, text)) => {
                    entry_id_at(&form, index).and_then(|id| form.set_comment(id, text))
                }
            },
            "show" => {
                print_form(&form);
                Ok(())
            }
            "submit" => match submit_form(client, report_id, &mut form, role).await {
                Ok(()) => return Ok(()),
                Err(err) => Err(err),
            },
            "quit" | "q" => {
                println!("Discarded unsubmitted feedback.");
                return Ok(());
            }
            other => Err(anyhow!("unknown command '{other}'")),
        };

        if let Err(err) = outcome {
            println!("error: {err}");
        }
    }

    println!("Discarded unsubmitted feedback.");
    Ok(())
}
