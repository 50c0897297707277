//! Contacts store inspection CLI.
//!
//! # Responsibility
//! - Print contact list/detail/count as JSON for quick local checks.
//! - Open the store read-only; this tool never writes.
//!
//! Usage: `mycontact_cli [--db PATH] list | show <ID> | count`

use mycontact_core::db::open_db_read_only;
use mycontact_core::{
    init_stderr_logging, ContactService, ContactsConfig, SqliteContactRepository,
};
use std::path::PathBuf;
use std::process::ExitCode;

const USAGE: &str = "usage: mycontact_cli [--db PATH] list | show <ID> | count";

#[derive(Debug, PartialEq, Eq)]
enum Command {
    List,
    Show(String),
    Count,
}

#[derive(Debug, PartialEq, Eq)]
struct Args {
    db_path: Option<PathBuf>,
    command: Command,
}

fn main() -> ExitCode {
    let args = match parse_args(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(message) => {
            eprintln!("{message}\n{USAGE}");
            return ExitCode::from(1);
        }
    };

    let mut config = match ContactsConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{err}");
            return ExitCode::from(1);
        }
    };
    if let Some(path) = args.db_path {
        config.db_path = path;
    }
    if let Err(err) = init_stderr_logging(&config.log_level) {
        eprintln!("logging disabled: {err}");
    }

    match run(&config, &args.command) {
        Ok(Some(output)) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Ok(None) => {
            eprintln!("contact not found");
            ExitCode::from(2)
        }
        Err(message) => {
            eprintln!("{message}");
            ExitCode::from(1)
        }
    }
}

/// Runs one command; `Ok(None)` means `show` found nothing.
fn run(config: &ContactsConfig, command: &Command) -> Result<Option<String>, String> {
    let conn = open_db_read_only(&config.db_path).map_err(|err| {
        format!(
            "cannot open contacts store `{}`: {err}",
            config.db_path.display()
        )
    })?;
    let repo = SqliteContactRepository::try_with_options(&conn, config.repo_options())
        .map_err(|err| err.to_string())?;
    let service = ContactService::new(repo);

    let json = match command {
        Command::List => {
            let contacts = service.list_contacts().map_err(|err| err.to_string())?;
            let entries = contacts
                .iter()
                .map(|contact| {
                    serde_json::json!({
                        "id": contact.id,
                        "display_name": contact.display_name,
                    })
                })
                .collect::<Vec<_>>();
            serde_json::to_string_pretty(&entries)
        }
        Command::Show(id) => match service.get_contact(id).map_err(|err| err.to_string())? {
            Some(contact) => serde_json::to_string_pretty(&contact),
            None => return Ok(None),
        },
        Command::Count => {
            let count = service.count_contacts().map_err(|err| err.to_string())?;
            serde_json::to_string(&serde_json::json!({ "count": count }))
        }
    };
    json.map(Some).map_err(|err| format!("failed to render json: {err}"))
}

fn parse_args(args: impl IntoIterator<Item = String>) -> Result<Args, String> {
    let mut db_path = None;
    let mut positional = Vec::new();
    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--db" => {
                let path = iter.next().ok_or("--db requires a path")?;
                db_path = Some(PathBuf::from(path));
            }
            "-h" | "--help" => return Err("help requested".to_string()),
            _ => positional.push(arg),
        }
    }

    let command = match positional.as_slice() {
        [cmd] if cmd == "list" => Command::List,
        [cmd] if cmd == "count" => Command::Count,
        [cmd, id] if cmd == "show" => Command::Show(id.clone()),
        [cmd] if cmd == "show" => return Err("show requires a contact id".to_string()),
        [] => return Err("missing command".to_string()),
        other => return Err(format!("unknown command `{}`", other.join(" "))),
    };

    Ok(Args { db_path, command })
}
