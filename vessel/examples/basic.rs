//! Basic example of the Vessel DI container.

use std::sync::Arc;

use vessel::prelude::*;

// === Define your types ===

struct ConsoleLogger {
    prefix: String,
}

impl ConsoleLogger {
    fn log(&self, msg: &str) {
        println!("[{}] {msg}", self.prefix);
    }
}

struct Database {
    url: Arc<String>,
    logger: Arc<ConsoleLogger>,
}

impl Database {
    fn query(&self, sql: &str) -> String {
        self.logger.log(&format!("Executing: {sql}"));
        format!("Results from {}", self.url)
    }
}

struct UserService {
    db: Arc<Database>,
    logger: Arc<ConsoleLogger>,
}

impl UserService {
    fn get_user(&self, id: u64) -> String {
        self.logger.log(&format!("Getting user {id}"));
        self.db.query(&format!("SELECT * FROM users WHERE id = {id}"))
    }
}

struct InfraProvider;

impl Provider for InfraProvider {
    fn register(&self, registrar: &mut dyn Registrar) -> Result<()> {
        registrar.bind(
            "db.url",
            Binding::parameter(String::from("postgres://localhost/myapp")),
        )?;
        registrar.bind(
            "Logger",
            Service::new(|_| {
                Ok(ConsoleLogger {
                    prefix: "LOG".to_string(),
                })
            })
            .tag("infra")
            .into(),
        )?;
        registrar.bind(
            "Database",
            Service::new(|args| {
                Ok(Database {
                    url: args.get(0)?,
                    logger: args.get(1)?,
                })
            })
            .depends_on(["db.url", "Logger"])
            .tag("infra")
            .into(),
        )
    }
}

fn main() -> Result<()> {
    // Initialize tracing (logging)
    tracing_subscriber::fmt()
        .with_env_filter("vessel_container=debug")
        .init();

    let mut container = Container::new();
    container.add_provider(&InfraProvider)?;

    // UserService: transient (new each time)
    container.register_service(
        "UserService",
        Service::new(|args| {
            Ok(UserService {
                db: args.get(0)?,
                logger: args.get(1)?,
            })
        })
        .depends_on(["Database", "Logger"])
        .transient(),
    )?;

    container.validate()?;
    println!("{}", container.describe());

    let service: Arc<UserService> = container.fetch_as("UserService")?;
    println!("{}", service.get_user(42));

    let again: Arc<UserService> = container.fetch_as("UserService")?;
    println!("{}", again.get_user(7));
    println!(
        "same service: {}, same database: {}",
        Arc::ptr_eq(&service, &again),
        Arc::ptr_eq(&service.db, &again.db),
    );

    for definition in container.tagged_services("infra") {
        println!("infra: {} -> {}", definition.name(), definition.produces());
    }

    println!("{container:?}");
    Ok(())
}
