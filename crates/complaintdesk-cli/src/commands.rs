use std::io::{self, Write};

use anyhow::{bail, Context, Result};

use complaintdesk_core::models::{ComplaintCreate, ComplaintFilter, TagCreate, UserCreate};
use complaintdesk_core::{ApiClient, Config};

use crate::cli::{Command, ComplaintsCommand, ListArgs, TagsCommand, UsersCommand};
use crate::output;

pub async fn run(client: &ApiClient, config: &mut Config, command: Command) -> Result<()> {
    match command {
        Command::Login { username } => login(client, config, username).await,
        Command::Logout => {
            client.logout()?;
            println!("Logged out.");
            Ok(())
        }
        Command::Whoami => {
            let me = client.current_user().await?;
            output::print_user(&me);
            Ok(())
        }
        Command::Complaints(cmd) => complaints(client, cmd).await,
        Command::Tags(cmd) => tags(client, cmd).await,
        Command::Users(cmd) => users(client, cmd).await,
    }
}

async fn login(client: &ApiClient, config: &mut Config, username: Option<String>) -> Result<()> {
    let username = match username.or_else(|| config.last_username.clone()) {
        Some(username) => username,
        None => prompt_username()?,
    };
    if username.is_empty() {
        bail!("Username required");
    }
    let password = prompt_password("Password: ")?;

    println!("Authenticating...");
    client
        .login(&username, &password)
        .await
        .context("Invalid username or password")?;

    config.last_username = Some(username.clone());
    println!("Logged in as {}.", username);
    Ok(())
}

fn prompt_username() -> Result<String> {
    print!("Username: ");
    io::stdout().flush()?;

    let mut username = String::new();
    io::stdin().read_line(&mut username)?;
    Ok(username.trim().to_string())
}

fn prompt_password(prompt: &str) -> Result<String> {
    let password = rpassword::prompt_password(prompt)?;
    if password.is_empty() {
        bail!("Password required");
    }
    Ok(password)
}

fn list_filter(args: ListArgs) -> ComplaintFilter {
    ComplaintFilter {
        search: args.search,
        status: args.status,
        priority: args.priority,
        tag_id: args.tag,
        limit: args.limit,
        ..Default::default()
    }
}

async fn complaints(client: &ApiClient, command: ComplaintsCommand) -> Result<()> {
    match command {
        ComplaintsCommand::List(args) => {
            let complaints = client.list_complaints(&list_filter(args)).await?;
            output::print_complaints(&complaints);
        }
        ComplaintsCommand::Show { id } => {
            let detail = client.complaint_detail(id).await?;
            output::print_complaint_detail(&detail);
        }
        ComplaintsCommand::Create {
            title,
            description,
            priority,
            tags,
        } => {
            let complaint = ComplaintCreate {
                title,
                description,
                priority,
                tag_ids: tags,
            };
            let created = client.create_complaint(&complaint).await?;
            println!("Created complaint #{}.", created.id);
        }
        ComplaintsCommand::Status { id, status } => {
            let updated = client.set_complaint_status(id, status).await?;
            println!("Complaint #{} is now {}.", updated.id, updated.status);
        }
        ComplaintsCommand::Assign { id } => {
            let updated = client.assign_to_me(id).await?;
            println!("Complaint #{} assigned to you.", updated.id);
        }
        ComplaintsCommand::Comment { id, text } => {
            if text.trim().is_empty() {
                bail!("Comment cannot be empty");
            }
            client.add_comment(id, &text).await?;
            println!("Comment added to complaint #{}.", id);
        }
    }
    Ok(())
}

async fn tags(client: &ApiClient, command: TagsCommand) -> Result<()> {
    match command {
        TagsCommand::List => {
            let tags = client.list_tags().await?;
            output::print_tags(&tags);
        }
        TagsCommand::Create { name, color } => {
            let mut tag = TagCreate::new(name);
            if let Some(color) = color {
                tag = tag.with_color(color);
            }
            let created = client.create_tag(&tag).await?;
            println!("Created tag #{} {}.", created.id, created.name);
        }
        TagsCommand::Delete { id } => {
            client.delete_tag(id).await?;
            println!("Deleted tag #{}.", id);
        }
    }
    Ok(())
}

async fn users(client: &ApiClient, command: UsersCommand) -> Result<()> {
    match command {
        UsersCommand::List { search } => {
            let users = client.list_users(search.as_deref()).await?;
            output::print_users(&users);
        }
        UsersCommand::Create { username, role } => {
            let password = prompt_password("Password for new user: ")?;
            let created = client
                .create_user(&UserCreate {
                    username,
                    password,
                    role,
                })
                .await?;
            println!("Created user #{} {} ({}).", created.id, created.username, created.role);
        }
        UsersCommand::ResetPassword { id } => {
            let password = prompt_password("New password: ")?;
            client.reset_password(id, &password).await?;
            println!("Password reset for user #{}.", id);
        }
        UsersCommand::Toggle { id } => {
            let user = client.toggle_user_status(id).await?;
            println!("User {} is now {}.", user.username, user.status_display().to_lowercase());
        }
    }
    Ok(())
}
