//! Plain-text rendering of API data for the terminal.

use complaintdesk_core::models::{Complaint, ComplaintDetail, Tag, User};
use complaintdesk_core::utils::{format_date, format_optional, truncate_string};

/// Width of the title column in complaint listings
const TITLE_WIDTH: usize = 40;

pub fn print_complaints(complaints: &[Complaint]) {
    if complaints.is_empty() {
        println!("No complaints found.");
        return;
    }
    println!(
        "{:<6} {:<width$} {:<12} {:<9} {}",
        "ID",
        "TITLE",
        "STATUS",
        "PRIORITY",
        "CREATED",
        width = TITLE_WIDTH
    );
    for complaint in complaints {
        println!("{}", complaint_row(complaint));
    }
}

fn complaint_row(complaint: &Complaint) -> String {
    format!(
        "{:<6} {:<width$} {:<12} {:<9} {}",
        complaint.id,
        truncate_string(&complaint.title, TITLE_WIDTH),
        complaint.status.to_string(),
        complaint.priority.to_string(),
        format_date(&complaint.created_at),
        width = TITLE_WIDTH
    )
}

pub fn print_complaint_detail(detail: &ComplaintDetail) {
    let c = &detail.complaint;
    println!("#{} {}", c.id, c.title);
    println!("Status:   {}", c.status);
    println!("Priority: {}", c.priority);
    println!(
        "Assigned: {}",
        c.assigned_to_id
            .map(|id| format!("user #{}", id))
            .unwrap_or_else(|| "unassigned".to_string())
    );
    if !c.tags.is_empty() {
        println!("Tags:     {}", c.tag_names());
    }
    println!("Created:  {}", format_date(&c.created_at));
    println!("Updated:  {}", format_optional(&c.updated_at.as_deref().map(format_date), "-"));
    println!();
    println!("{}", c.description);

    println!();
    println!("Comments ({}):", detail.comments.len());
    for comment in &detail.comments {
        println!(
            "  [{}] {}: {}",
            format_date(&comment.created_at),
            comment.author(),
            comment.content
        );
    }

    println!();
    println!("History:");
    for entry in &detail.audit_logs {
        println!(
            "  [{}] {} (user #{})",
            format_date(&entry.timestamp),
            entry.change_description,
            entry.changed_by_id
        );
    }
}

pub fn print_tags(tags: &[Tag]) {
    if tags.is_empty() {
        println!("No tags defined.");
        return;
    }
    for tag in tags {
        println!("{:<6} {:<24} {}", tag.id, tag.name, tag.color);
    }
}

pub fn print_users(users: &[User]) {
    if users.is_empty() {
        println!("No users found.");
        return;
    }
    println!("{:<6} {:<20} {:<6} {:<9} {}", "ID", "USERNAME", "ROLE", "STATUS", "LAST LOGIN");
    for user in users {
        println!(
            "{:<6} {:<20} {:<6} {:<9} {}",
            user.id,
            truncate_string(&user.username, 20),
            user.role.to_string(),
            user.status_display(),
            user.last_login
                .as_deref()
                .map(format_date)
                .unwrap_or_else(|| "never".to_string())
        );
    }
}

pub fn print_user(user: &User) {
    println!("{} (id {}, {})", user.username, user.id, user.role);
    println!("Status: {}", user.status_display());
    if let Some(ref last_login) = user.last_login {
        println!("Last login: {}", format_date(last_login));
    }
}
