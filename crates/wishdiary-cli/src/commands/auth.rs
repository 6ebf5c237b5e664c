//! Account management commands for CLI.

use clap::Subcommand;
use wishdiary_core::storage::DiaryDb;
use wishdiary_core::AuthService;

#[derive(Subcommand)]
pub enum AuthAction {
    /// Create an account and sign in
    Register {
        /// Email address
        email: String,
        /// Password
        #[arg(long)]
        password: String,
        /// Display name
        #[arg(long)]
        display_name: Option<String>,
    },
    /// Sign in
    Login {
        /// Email address
        email: String,
        /// Password
        #[arg(long)]
        password: String,
    },
    /// Sign out
    Logout,
    /// Show the signed-in user
    Whoami,
    /// Request a (mock) password reset
    ResetPassword {
        /// Email address
        email: String,
    },
}

pub fn run(action: AuthAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = DiaryDb::open()?;
    let auth = AuthService::initialize(&db)?;

    match action {
        AuthAction::Register {
            email,
            password,
            display_name,
        } => {
            let user = auth.register(&email, &password, display_name.as_deref())?;
            println!("Registered and signed in as {}", user.email);
            println!("{}", serde_json::to_string_pretty(&user)?);
        }
        AuthAction::Login { email, password } => {
            let user = auth.sign_in(&email, &password)?;
            println!("Signed in as {}", user.email);
            println!("{}", serde_json::to_string_pretty(&user)?);
        }
        AuthAction::Logout => {
            auth.sign_out()?;
            println!("Signed out");
        }
        AuthAction::Whoami => match auth.current_user() {
            Some(user) => println!("{}", serde_json::to_string_pretty(&user)?),
            None => println!("Not signed in"),
        },
        AuthAction::ResetPassword { email } => {
            auth.reset_password(&email)?;
            println!("Password reset requested for {email} (mock provider: no mail is sent)");
        }
    }
    Ok(())
}
