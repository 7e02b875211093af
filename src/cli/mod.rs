pub mod commands;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "portfolio-api")]
#[command(about = "Portfolio API - projects, contact messages and admin authentication")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Run the HTTP server (default)")]
    Serve(commands::serve::ServeArgs),

    #[command(about = "Create an admin user, or reset an existing admin's password")]
    SeedAdmin(commands::seed_admin::SeedAdminArgs),
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        None => commands::serve::handle(commands::serve::ServeArgs::default()).await,
        Some(Commands::Serve(args)) => commands::serve::handle(args).await,
        Some(Commands::SeedAdmin(args)) => commands::seed_admin::handle(args).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_subcommand_means_serve() {
        let cli = Cli::try_parse_from(["portfolio-api"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn seed_admin_arguments() {
        let cli = Cli::try_parse_from([
            "portfolio-api",
            "seed-admin",
            "--username",
            "Admin",
            "--password",
            "hunter22",
            "--email",
            "admin@portfolio.com",
        ])
        .unwrap();

        match cli.command {
            Some(Commands::SeedAdmin(args)) => {
                assert_eq!(args.username, "Admin");
                assert_eq!(args.email.as_deref(), Some("admin@portfolio.com"));
                assert_eq!(args.full_name, None);
            }
            _ => panic!("expected seed-admin"),
        }
    }

    #[test]
    fn seed_admin_requires_password() {
        assert!(Cli::try_parse_from(["portfolio-api", "seed-admin", "--username", "Admin"]).is_err());
    }
}
