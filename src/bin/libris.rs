//! Libris CLI
//!
//! Command-line front end: authenticate, run one operation, print the result.

use std::process::ExitCode;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use libris::clock::parse_date;
use libris::config::SyncStrategy;
use libris::{Config, Library, LibrisError, Loan, Member, NewMember, Role};
use tracing_subscriber::{fmt, EnvFilter};

/// Libris CLI
#[derive(Parser, Debug)]
#[command(name = "libris")]
#[command(about = "Library catalogue, members and loans kept in CSV files")]
#[command(version)]
struct Args {
    /// Data directory holding books.csv, members.csv and loans.csv
    #[arg(short, long, default_value = ".")]
    data_dir: String,

    /// Member id to act as
    #[arg(short, long, global = true)]
    member: Option<String>,

    /// Secret for --member
    #[arg(short, long, env = "LIBRIS_SECRET", hide_env_values = true, global = true)]
    secret: Option<String>,

    /// Days a book may be kept
    #[arg(long, default_value = "14")]
    loan_days: u32,

    /// Skip fsync (faster, less durable)
    #[arg(long)]
    no_sync: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create the first librarian (--member/--secret) in a library without one
    Init {
        /// Display name
        #[arg(long)]
        name: String,

        /// Contact address
        #[arg(long)]
        email: String,
    },

    /// Add a title to the catalogue (librarian)
    AddBook {
        isbn: String,
        title: String,
        author: String,
        copies: u32,
    },

    /// Register a member (librarian)
    Register {
        member_id: String,
        name: String,
        email: String,

        /// Secret for the new member
        #[arg(long, env = "LIBRIS_NEW_SECRET", hide_env_values = true)]
        new_secret: String,

        /// Grant librarian privileges
        #[arg(long)]
        librarian: bool,
    },

    /// Issue a book to a member (librarian)
    Issue { isbn: String, member_id: String },

    /// Take a book back from a member (librarian)
    Return { isbn: String, member_id: String },

    /// List overdue loans (librarian)
    Overdue {
        /// Report date, YYYY-MM-DD (default: today)
        #[arg(long)]
        as_of: Option<String>,
    },

    /// Search titles and authors
    Search { keyword: String },

    /// Borrow a book for yourself
    Borrow { isbn: String },

    /// List your loans
    MyLoans,
}

fn main() -> ExitCode {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,libris=info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config = Config::builder()
        .data_dir(&args.data_dir)
        .loan_period_days(args.loan_days)
        .sync_strategy(if args.no_sync {
            SyncStrategy::Never
        } else {
            SyncStrategy::Always
        })
        .build();

    let result = Library::open(config).and_then(|library| run(&library, &args));

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", describe(&e));
            ExitCode::FAILURE
        }
    }
}

fn run(library: &Library, args: &Args) -> libris::Result<()> {
    match &args.command {
        Commands::Init { name, email } => {
            let (member_id, secret) = credentials(args)?;
            let member =
                library.bootstrap_librarian(NewMember::new(member_id, name, secret, email))?;
            println!("Librarian {} created.", member.member_id);
        }

        Commands::AddBook {
            isbn,
            title,
            author,
            copies,
        } => {
            require_librarian(&login(library, args)?)?;
            library.add_book(isbn, title, author, *copies)?;
            println!("Book added.");
        }

        Commands::Register {
            member_id,
            name,
            email,
            new_secret,
            librarian,
        } => {
            require_librarian(&login(library, args)?)?;
            let role = if *librarian { Role::Librarian } else { Role::Member };
            library.register_member(
                NewMember::new(member_id, name, new_secret, email).role(role),
            )?;
            println!("Member registered.");
        }

        Commands::Issue { isbn, member_id } => {
            require_librarian(&login(library, args)?)?;
            print_issued(&library.issue(member_id, isbn)?);
        }

        Commands::Return { isbn, member_id } => {
            require_librarian(&login(library, args)?)?;
            library.return_loan(member_id, isbn)?;
            println!("\u{2713} Book returned.");
        }

        Commands::Overdue { as_of } => {
            require_librarian(&login(library, args)?)?;
            let as_of = match as_of {
                Some(date) => {
                    parse_date(date).ok_or_else(|| {
                        LibrisError::Config(format!("--as-of must be YYYY-MM-DD, got '{}'", date))
                    })?;
                    date.clone()
                }
                None => library.today(),
            };

            let report = library.overdue_report(&as_of)?;
            if report.is_empty() {
                println!("No overdue loans as of {}.", report.as_of());
            }
            for loan in &report {
                println!(
                    "LoanID: {}, MemberID: {}, ISBN: {}, DueDate: {}",
                    loan.loan_id, loan.member_id, loan.isbn, loan.due_date
                );
            }
        }

        Commands::Search { keyword } => {
            login(library, args)?;
            for book in library.search_catalogue(keyword)? {
                println!(
                    "{} | {} | {} | {}/{} available",
                    book.isbn, book.title, book.author, book.copies_available, book.copies_total
                );
            }
        }

        Commands::Borrow { isbn } => {
            let member = login(library, args)?;
            print_issued(&library.issue(&member.member_id, isbn)?);
        }

        Commands::MyLoans => {
            let member = login(library, args)?;
            for loan in library.loans_for_member(&member.member_id)? {
                println!(
                    "LoanID: {}, ISBN: {}, IssueDate: {}, DueDate: {}, ReturnDate: {}",
                    loan.loan_id,
                    loan.isbn,
                    loan.issue_date,
                    loan.due_date,
                    loan.return_date.as_deref().unwrap_or("-")
                );
            }
        }
    }

    Ok(())
}

fn credentials(args: &Args) -> libris::Result<(&str, &str)> {
    match (&args.member, &args.secret) {
        (Some(member), Some(secret)) => Ok((member.as_str(), secret.as_str())),
        _ => Err(LibrisError::Unauthorized(
            "--member and --secret (or LIBRIS_SECRET) are required".to_string(),
        )),
    }
}

fn login(library: &Library, args: &Args) -> libris::Result<Member> {
    let (member_id, secret) = credentials(args)?;
    library
        .verify_member(member_id, secret)?
        .ok_or_else(|| LibrisError::Unauthorized("invalid credentials".to_string()))
}

fn require_librarian(member: &Member) -> libris::Result<()> {
    if member.is_librarian() {
        Ok(())
    } else {
        Err(LibrisError::Unauthorized(format!(
            "{} is not a librarian",
            member.member_id
        )))
    }
}

fn print_issued(loan: &Loan) {
    let due = NaiveDate::parse_from_str(&loan.due_date, "%Y-%m-%d")
        .map(|d| d.format("%d-%b-%Y").to_string())
        .unwrap_or_else(|_| loan.due_date.clone());
    println!("\u{2713} Book issued. Due on {}.", due);
}

/// One message per error kind
fn describe(err: &LibrisError) -> String {
    match err {
        LibrisError::BookNotFound { isbn } => format!("No book with ISBN {}.", isbn),
        LibrisError::NoCopiesAvailable { isbn } => {
            format!("Book not available: every copy of {} is on loan.", isbn)
        }
        LibrisError::LoanNotFound { .. } => "Loan not found or already returned.".to_string(),
        LibrisError::DuplicateKey(what) => format!("Already exists: {}.", what),
        LibrisError::NotFound(what) => format!("Not found: {}.", what),
        LibrisError::Unauthorized(reason) => format!("Access denied: {}.", reason),
        other => format!("Error: {}", other),
    }
}
