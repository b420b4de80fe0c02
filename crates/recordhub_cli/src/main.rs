//! Command-line front end for the records core.
//!
//! # Responsibility
//! - Build the composition root: config, logging, storage, service.
//! - Log in with `--user/--password` and authorize before every action.
//! - Render records for the terminal and write CSV/JSON exports.

mod output;

use anyhow::{bail, Context};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use log::info;
use output::{print_table, write_export, ExportFormat};
use recordhub_core::{
    access_level, init_from_config, new_record_id, Action, CoreConfig, Customer, Employee,
    MembershipLevel, PersonRecord, RecordsService, Resource, Role, StorageHandle, UpdateOutcome,
};
use std::path::PathBuf;
use std::process::ExitCode;

/// Manage employee, customer and user records.
#[derive(Parser)]
#[command(name = "recordhub", author, version, about, long_about = None)]
struct Cli {
    /// SQLite database file. Overrides RECORDHUB_DB_PATH.
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Directory for rotated log files. Overrides RECORDHUB_LOG_DIR.
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    /// trace|debug|info|warn|error. Overrides RECORDHUB_LOG_LEVEL.
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Account used to authorize the command.
    #[arg(long, short = 'u', global = true)]
    user: Option<String>,

    #[arg(long, short = 'p', global = true)]
    password: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create the schema and the initial admin account if missing.
    Bootstrap,
    /// Verify credentials and print the account's access summary.
    LoginCheck,
    /// Employee records.
    #[command(subcommand)]
    Employee(EmployeeCommand),
    /// Customer records.
    #[command(subcommand)]
    Customer(CustomerCommand),
    /// User accounts.
    #[command(subcommand)]
    User(UserCommand),
    /// Print aggregate statistics.
    Stats,
    /// Write all records of one kind as CSV or JSON.
    Export(ExportArgs),
}

#[derive(Subcommand)]
enum EmployeeCommand {
    Add(EmployeeFields),
    List,
    Show { id: String },
    Update(EmployeePatch),
    Delete { id: String },
}

#[derive(Args)]
struct EmployeeFields {
    /// Generated as EMP-xxxxxxxx when omitted.
    #[arg(long)]
    id: Option<String>,
    #[arg(long)]
    name: String,
    #[arg(long)]
    age: u32,
    #[arg(long)]
    salary: f64,
    #[arg(long)]
    job_title: String,
}

#[derive(Args)]
struct EmployeePatch {
    id: String,
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    age: Option<u32>,
    #[arg(long)]
    salary: Option<f64>,
    #[arg(long)]
    job_title: Option<String>,
}

#[derive(Subcommand)]
enum CustomerCommand {
    Add(CustomerFields),
    List,
    Show { id: String },
    Update(CustomerPatch),
    Delete { id: String },
}

#[derive(Args)]
struct CustomerFields {
    /// Generated as CUS-xxxxxxxx when omitted.
    #[arg(long)]
    id: Option<String>,
    #[arg(long)]
    name: String,
    #[arg(long)]
    age: u32,
    /// Bronze, Silver, Gold or Platinum (any case).
    #[arg(long)]
    level: MembershipLevel,
    /// Format: YYYY-MM-DD. Must not be in the future.
    #[arg(long)]
    last_purchase: NaiveDate,
}

#[derive(Args)]
struct CustomerPatch {
    id: String,
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    age: Option<u32>,
    #[arg(long)]
    level: Option<MembershipLevel>,
    #[arg(long)]
    last_purchase: Option<NaiveDate>,
}

#[derive(Subcommand)]
enum UserCommand {
    Add {
        username: String,
        /// Admin, Manager, "HR Specialist", "Customer Service Agent" or "Data Analyst".
        #[arg(long)]
        role: Role,
        #[arg(long)]
        new_password: String,
    },
    List,
    Delete {
        username: String,
    },
}

#[derive(Args)]
struct ExportArgs {
    #[arg(value_enum)]
    target: ExportTarget,
    #[arg(long, value_enum, default_value_t = ExportFormat::Csv)]
    format: ExportFormat,
    /// Destination file. Writes to stdout when omitted.
    #[arg(long, short = 'o')]
    output: Option<PathBuf>,
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum ExportTarget {
    Employees,
    Customers,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = load_config(&cli)?;
    init_from_config(&config).context("failed to start logging")?;

    let handle = StorageHandle::open(&config.db_path).with_context(|| {
        format!("cannot open database at {}", config.db_path.display())
    })?;
    let mut service = RecordsService::bootstrap(&handle, &config.initial_admin)
        .context("failed to seed the initial admin account")?;

    if let Command::Bootstrap = cli.command {
        println!("database ready at {}", config.db_path.display());
        return Ok(());
    }

    let (Some(user), Some(password)) = (cli.user.as_deref(), cli.password.as_deref()) else {
        bail!("this command requires --user and --password");
    };
    let me = service.login(user, password)?;
    info!("event=cli_command module=cli status=start role={}", me.role);

    match cli.command {
        Command::Bootstrap => Ok(()),
        Command::LoginCheck => {
            println!("{} ({})", me.username, me.role);
            for resource in [
                Resource::Employees,
                Resource::Customers,
                Resource::Users,
                Resource::Analytics,
            ] {
                println!("  {resource}: {:?}", access_level(me.role, resource));
            }
            Ok(())
        }
        Command::Employee(command) => run_employee(&service, command),
        Command::Customer(command) => run_customer(&service, command),
        Command::User(command) => run_user(&mut service, command),
        Command::Stats => run_stats(&service),
        Command::Export(args) => run_export(&service, args),
    }
}

fn load_config(cli: &Cli) -> anyhow::Result<CoreConfig> {
    let mut config = CoreConfig::from_env().context("invalid RECORDHUB_* environment")?;
    if let Some(db) = &cli.db {
        config.db_path = db.clone();
    }
    if let Some(dir) = &cli.log_dir {
        config.log_dir = Some(dir.clone());
    }
    if let Some(dir) = config.log_dir.take() {
        let absolute = if dir.is_absolute() {
            dir
        } else {
            std::env::current_dir()
                .context("cannot resolve the working directory")?
                .join(dir)
        };
        config.log_dir = Some(absolute);
    }
    if let Some(level) = &cli.log_level {
        config.set_log_level(level)?;
    }
    Ok(config)
}

fn run_employee(service: &RecordsService<'_>, command: EmployeeCommand) -> anyhow::Result<()> {
    match command {
        EmployeeCommand::Add(fields) => {
            service.authorize(Action::Create, Resource::Employees)?;
            let id = fields.id.unwrap_or_else(|| new_record_id("EMP"));
            let employee = Employee::new(id, fields.name, fields.age, fields.salary, fields.job_title);
            service.save_employee(&employee)?;
            println!("added {}", employee.id);
        }
        EmployeeCommand::List => {
            service.authorize(Action::View, Resource::Employees)?;
            for employee in service.get_all_employees()? {
                println!("{}", employee.describe());
            }
        }
        EmployeeCommand::Show { id } => {
            service.authorize(Action::View, Resource::Employees)?;
            println!("{}", service.get_employee_by_id(&id)?.describe());
        }
        EmployeeCommand::Update(patch) => {
            service.authorize(Action::Update, Resource::Employees)?;
            let mut employee = service.get_employee_by_id(&patch.id)?;
            if let Some(name) = patch.name {
                employee.name = name;
            }
            if let Some(age) = patch.age {
                employee.age = age;
            }
            if let Some(salary) = patch.salary {
                employee.salary = salary;
            }
            if let Some(job_title) = patch.job_title {
                employee.job_title = job_title;
            }
            report_update(&employee.id, service.update_employee(&employee)?);
        }
        EmployeeCommand::Delete { id } => {
            service.authorize(Action::Delete, Resource::Employees)?;
            report_delete(&id, service.delete_employee(&id)?);
        }
    }
    Ok(())
}

fn run_customer(service: &RecordsService<'_>, command: CustomerCommand) -> anyhow::Result<()> {
    match command {
        CustomerCommand::Add(fields) => {
            service.authorize(Action::Create, Resource::Customers)?;
            let id = fields.id.unwrap_or_else(|| new_record_id("CUS"));
            let customer = Customer::new(
                id,
                fields.name,
                fields.age,
                fields.level,
                fields.last_purchase,
            );
            service.save_customer(&customer)?;
            println!("added {}", customer.id);
        }
        CustomerCommand::List => {
            service.authorize(Action::View, Resource::Customers)?;
            for customer in service.get_all_customers()? {
                println!("{}", customer.describe());
            }
        }
        CustomerCommand::Show { id } => {
            service.authorize(Action::View, Resource::Customers)?;
            println!("{}", service.get_customer_by_id(&id)?.describe());
        }
        CustomerCommand::Update(patch) => {
            service.authorize(Action::Update, Resource::Customers)?;
            let mut customer = service.get_customer_by_id(&patch.id)?;
            if let Some(name) = patch.name {
                customer.name = name;
            }
            if let Some(age) = patch.age {
                customer.age = age;
            }
            if let Some(level) = patch.level {
                customer.membership_level = level;
            }
            if let Some(date) = patch.last_purchase {
                customer.last_purchase_date = date;
            }
            report_update(&customer.id, service.update_customer(&customer)?);
        }
        CustomerCommand::Delete { id } => {
            service.authorize(Action::Delete, Resource::Customers)?;
            report_delete(&id, service.delete_customer(&id)?);
        }
    }
    Ok(())
}

fn run_user(service: &mut RecordsService<'_>, command: UserCommand) -> anyhow::Result<()> {
    match command {
        UserCommand::Add {
            username,
            role,
            new_password,
        } => {
            service.authorize(Action::Create, Resource::Users)?;
            let created = service.register_new_user(&username, &new_password, role)?;
            println!("added {} ({})", created.username, created.role);
        }
        UserCommand::List => {
            service.authorize(Action::View, Resource::Users)?;
            let rows = service
                .get_all_users()?
                .into_iter()
                .map(|user| vec![user.username, user.role.to_string()])
                .collect::<Vec<_>>();
            print_table(&["Username", "Role"], &rows);
        }
        UserCommand::Delete { username } => {
            service.authorize(Action::Delete, Resource::Users)?;
            report_delete(&username, service.delete_user(&username)?);
        }
    }
    Ok(())
}

fn run_stats(service: &RecordsService<'_>) -> anyhow::Result<()> {
    service.authorize(Action::View, Resource::Analytics)?;

    println!("average age: {:.2}", service.average_age()?);
    println!("average salary: {:.2}", service.average_salary()?);

    let by_title = service.average_salary_by_job_title()?;
    let headcount = service.employees_per_job_title()?;
    let rows = by_title
        .iter()
        .map(|(title, average)| {
            vec![
                title.clone(),
                headcount.get(title).copied().unwrap_or(0).to_string(),
                format!("{average:.2}"),
            ]
        })
        .collect::<Vec<_>>();
    print_table(&["JobTitle", "Employees", "AvgSalary"], &rows);

    let per_level = service.customers_per_membership_level()?;
    let rows = MembershipLevel::ALL
        .iter()
        .map(|level| {
            vec![
                level.to_string(),
                per_level.get(level).copied().unwrap_or(0).to_string(),
            ]
        })
        .collect::<Vec<_>>();
    print_table(&["MembershipLevel", "Customers"], &rows);
    Ok(())
}

fn run_export(service: &RecordsService<'_>, args: ExportArgs) -> anyhow::Result<()> {
    let table = match args.target {
        ExportTarget::Employees => {
            service.authorize(Action::Export, Resource::Employees)?;
            service.employee_export_table()?
        }
        ExportTarget::Customers => {
            service.authorize(Action::Export, Resource::Customers)?;
            service.customer_export_table()?
        }
    };
    if table.is_empty() {
        eprintln!("nothing to export");
    }
    write_export(&table, args.format, args.output.as_deref())
}

fn report_update(id: &str, outcome: UpdateOutcome) {
    match outcome {
        UpdateOutcome::Updated => println!("updated {id}"),
        UpdateOutcome::NoMatch => println!("no record {id}; nothing updated"),
    }
}

fn report_delete(key: &str, deleted: bool) {
    if deleted {
        println!("deleted {key}");
    } else {
        println!("no record {key}; nothing deleted");
    }
}
