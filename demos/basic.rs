//! Basic example demonstrating the GtR API client.
//!
//! Run with:
//! ```
//! GTR_SERIALISATION=json cargo run --example basic
//! ```

use gtrclient::{CerifClient, GtrClient, IterOptions};

#[tokio::main]
async fn main() -> gtrclient::Result<()> {
    // Initialize tracing for debugging (optional)
    tracing_subscriber::fmt::init();

    // Create client from environment variables
    println!("Creating GtR client...");
    let client = GtrClient::from_env()?;
    println!(
        "Connected to: {} ({})",
        client.base_url(),
        client.serialisation()
    );

    // List first page of projects
    println!("\n--- Listing Projects (first page) ---");
    let mut projects = client.projects(Some(1), Some(25)).await?;
    println!(
        "Page {:?} of {:?} ({:?} records)",
        projects.current_page(),
        projects.pages(),
        projects.record_count()
    );

    let items = projects.items()?;
    for project in items.iter().take(5) {
        println!(
            "  - {} ({})",
            project.title().unwrap_or_default(),
            project.id().unwrap_or_default()
        );
    }

    // Follow the first project's relations
    if let Some(first) = items.first() {
        let Some(id) = first.id() else {
            return Ok(());
        };

        println!("\n--- Project details for {id} ---");
        let project = client.project(&id).await?;
        println!("Status: {:?}", project.status());
        println!("Funder: {:?}", project.funder());
        println!("Start:  {:?}", project.start_date());

        if let Some(mut lead) = project.lead_organisation()? {
            lead.fetch().await?;
            println!(
                "Lead organisation: {} with {} projects",
                lead.name().unwrap_or_default(),
                lead.projects()?.len()
            );
        }

        for person in project.people()? {
            println!("  person: {}", person.name().unwrap_or_default());
        }
    }

    // Walk the next two pages without resetting
    println!("\n--- Next pages ---");
    let mut iter = projects.iter(IterOptions {
        reset_pages: false,
        stop_at_page_boundary: true,
    });
    let mut count = 0;
    while let Some(_project) = iter.next().await? {
        count += 1;
    }
    println!("Current page holds {count} projects");

    for _ in 0..2 {
        if !projects.next_page().await? {
            break;
        }
        println!(
            "Page {:?}: {} projects",
            projects.current_page(),
            projects.items()?.len()
        );
    }

    // CERIF view of the same data
    println!("\n--- CERIF classes ---");
    let cerif = CerifClient::from_env()?;
    if let Some(class) = cerif.cerif_class("cf7799e0-3477-11e1-b86c-0800200c9a66").await? {
        for term in class.term_relations()? {
            println!("  term: {}", term.value().unwrap_or_default());
        }
    } else {
        println!("  class not found");
    }

    Ok(())
}
