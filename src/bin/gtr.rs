//! Gateway to Research CLI binary.
//!
//! A command-line interface for browsing the GtR API.

use clap::Parser;
use gtrclient::cli::{CerifCommand, Cli, Command, Entity};
use gtrclient::output::PrettyPrint;
use gtrclient::{
    CerifClient, ClientOptions, GtrClient, List, Organisation, PaginationParams, Person, Project,
    Publication, Resource, ResourceList,
};
use std::process::ExitCode;
use tabled::{Table, Tabled};
use tracing::Level;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    let options = match ClientOptions::from_env() {
        Ok(options) => options.with_serialisation(cli.serialisation()),
        Err(e) => {
            eprintln!("Error: {e}");
            eprintln!("Hint: Check the GTR_* environment variables");
            return ExitCode::FAILURE;
        }
    };

    match run(cli, options).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli, options: ClientOptions) -> gtrclient::Result<()> {
    match cli.command {
        Command::Get { entity, id } => {
            let client = GtrClient::new(&cli.base_url, options)?;
            handle_get(&client, entity, &id, cli.raw).await
        }
        Command::List {
            entity,
            page,
            page_size,
            all,
        } => {
            let client = GtrClient::new(&cli.base_url, options.with_page_size(page_size))?;
            handle_list(&client, entity, page, all, cli.raw).await
        }
        Command::Cerif { command } => {
            let client = CerifClient::new(&cli.base_url, options)?;
            handle_cerif(&client, command, cli.raw).await
        }
    }
}

async fn handle_get(
    client: &GtrClient,
    entity: Entity,
    id: &str,
    raw: bool,
) -> gtrclient::Result<()> {
    match entity {
        Entity::Project => output_single(&client.project(id).await?, |p| p.render(), raw),
        Entity::Organisation => {
            output_single(&client.organisation(id).await?, |o| o.render(), raw)
        }
        Entity::Person => output_single(&client.person(id).await?, |p| p.render(), raw),
        Entity::Publication => {
            output_single(&client.publication(id).await?, |p| p.render(), raw)
        }
    }
}

async fn handle_list(
    client: &GtrClient,
    entity: Entity,
    page: Option<u32>,
    all: bool,
    raw: bool,
) -> gtrclient::Result<()> {
    match entity {
        Entity::Project => {
            output_list::<Project, _, _>(client, page, all, raw, |p| ProjectRow::from(p)).await
        }
        Entity::Organisation => {
            output_list::<Organisation, _, _>(client, page, all, raw, |i| NamedRow::from(i)).await
        }
        Entity::Person => {
            output_list::<Person, _, _>(client, page, all, raw, |i| NamedRow::from(i)).await
        }
        Entity::Publication => {
            output_list::<Publication, _, _>(client, page, all, raw, |i| NamedRow::from(i)).await
        }
    }
}

async fn handle_cerif(
    client: &CerifClient,
    command: CerifCommand,
    raw: bool,
) -> gtrclient::Result<()> {
    match command {
        CerifCommand::Project { uuid } => {
            output_single(&client.project(&uuid).await?, |p| p.render(), raw)
        }
        CerifCommand::Class { uuid } => match client.cerif_class(&uuid).await? {
            Some(class) => output_single(&class, |c| c.render(), raw),
            None => {
                eprintln!("No CERIF class with id {uuid}");
                Ok(())
            }
        },
    }
}

fn output_single<T, F>(item: &T, render: F, raw: bool) -> gtrclient::Result<()>
where
    T: PrettyPrint,
    F: Fn(&T) -> gtrclient::Result<String>,
{
    if raw {
        println!("{}", render(item)?);
    } else {
        println!("{}", item.pretty_print());
    }
    Ok(())
}

async fn output_list<R, Row, F>(
    client: &GtrClient,
    page: Option<u32>,
    all: bool,
    raw: bool,
    to_row: F,
) -> gtrclient::Result<()>
where
    R: Resource,
    Row: Tabled,
    F: Fn(&R) -> Row,
{
    let params = PaginationParams::new(page.or(Some(1)), client.page_size());
    let mut list: ResourceList<R> = R::list(client, params).await?;

    if raw {
        println!("{}", list.render()?);
        return Ok(());
    }

    let items = if all {
        list.collect_all().await?
    } else {
        list.items()?
    };
    let rows: Vec<Row> = items.iter().map(to_row).collect();
    println!("{}", Table::new(rows));

    match (list.current_page(), list.pages(), list.record_count()) {
        (Some(current), Some(pages), Some(total)) if !all => {
            println!("\nPage {current}/{pages} ({total} total items)");
        }
        (_, _, Some(total)) => println!("\n{} of {total} items", items.len()),
        _ => println!("\n{} items (no paging information)", items.len()),
    }
    Ok(())
}

// Table row types for list output

#[derive(Tabled)]
struct ProjectRow {
    id: String,
    title: String,
    status: String,
}

impl From<&Project> for ProjectRow {
    fn from(p: &Project) -> Self {
        Self {
            id: p.id().unwrap_or_default(),
            title: p.title().unwrap_or_default(),
            status: p.status().unwrap_or_default(),
        }
    }
}

#[derive(Tabled)]
struct NamedRow {
    id: String,
    name: String,
}

impl From<&Organisation> for NamedRow {
    fn from(o: &Organisation) -> Self {
        Self {
            id: o.id().unwrap_or_default(),
            name: o.name().unwrap_or_default(),
        }
    }
}

impl From<&Person> for NamedRow {
    fn from(p: &Person) -> Self {
        Self {
            id: p.id().unwrap_or_default(),
            name: p.name().unwrap_or_default(),
        }
    }
}

impl From<&Publication> for NamedRow {
    fn from(p: &Publication) -> Self {
        Self {
            id: p.id().unwrap_or_default(),
            name: p.title().unwrap_or_default(),
        }
    }
}
