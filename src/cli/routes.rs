//! Route table inspection

use anyhow::Result;

use crate::dashboard::Dashboard;

/// Print the route table, or resolve a single path.
pub fn run(dashboard: &Dashboard, path: Option<&str>) -> Result<()> {
    let Some(path) = path else {
        println!("\n{:<50} {}", "PATH", "VIEW");
        println!("{:-<72}", "");
        for (pattern, desc) in dashboard.router.routes() {
            println!("{:<50} {}", pattern, desc);
        }
        return Ok(());
    };

    let route = dashboard.router.resolve(path)?;
    println!();
    println!("Path:     {}", route.path);
    if let Some(from) = &route.redirected_from {
        println!("From:     {}", from);
    }
    match route.parent {
        Some(parent) => println!("View:     {} > {}", parent, route.view),
        None => println!("View:     {}", route.view),
    }
    if let Some(name) = route.name {
        println!("Name:     {}", name);
    }
    for (key, value) in &route.params {
        println!("  :{:<12} {}", key, value);
    }
    if let Some(query) = &route.query {
        println!("Query:    {}", query);
    }
    if route.meta.full_container {
        println!("Layout:   full width");
    }
    Ok(())
}
