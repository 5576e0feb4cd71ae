use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::params;

pub type DbPool = Pool<SqliteConnectionManager>;

pub const MIGRATIONS: &str = include_str!("schema.sql");

pub fn init_pool(database_path: &str) -> DbPool {
    let manager = SqliteConnectionManager::file(database_path).with_init(|conn| {
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;
        Ok(())
    });
    Pool::builder()
        .max_size(8)
        .build(manager)
        .expect("Failed to create DB pool")
}

pub fn run_migrations(pool: &DbPool) {
    let conn = pool.get().expect("Failed to get DB connection for migrations");
    conn.execute_batch(MIGRATIONS)
        .expect("Failed to run migrations");
    log::info!("Database migrations complete");
}

/// Seed the common-core project catalogue if the projects table is empty.
/// Projects are read-only over HTTP; this is the only write path for them.
pub fn seed_projects(pool: &DbPool) {
    let conn = pool.get().expect("Failed to get DB connection for seeding");

    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM projects", [], |row| row.get(0))
        .unwrap_or(0);
    if count > 0 {
        log::info!("Projects already seeded ({count} rows), skipping");
        return;
    }

    let catalogue: &[(&str, &str, &str)] = &[
        ("Libft", "libft", "Your very first own library"),
        ("ft_printf", "ft-printf", "Recode printf"),
        ("get_next_line", "get-next-line", "Read a line from a file descriptor"),
        ("Born2beroot", "born2beroot", "System administration basics"),
        ("push_swap", "push-swap", "Sort data on a stack with a limited instruction set"),
        ("minishell", "minishell", "As beautiful as a shell"),
        ("Philosophers", "philosophers", "Threads, mutexes and the dining problem"),
        ("cub3d", "cub3d", "A raycasting engine inspired by Wolfenstein 3D"),
    ];

    for (index, (name, slug, description)) in catalogue.iter().enumerate() {
        let inserted = conn.execute(
            "INSERT INTO projects (name, slug, description, order_index) VALUES (?1, ?2, ?3, ?4)",
            params![name, slug, description, index as i64],
        );
        if let Err(e) = inserted {
            log::error!("Seed project {slug} failed: {e}");
        }
    }

    log::info!("Seeded {} projects", catalogue.len());
}
