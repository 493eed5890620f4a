//! Terminal UI utilities.
//!
//! Column-aligned plain-text tables, used by `funicular routes`.
//!
//! ## Example
//!
//! ```rust
//! use funicular::ui::Table;
//!
//! let mut table = Table::new(&[("Name", 6), ("Value", 5)]);
//! table.add_row(vec!["key".to_string(), "value".to_string()]);
//! print!("{}", table.render());
//! ```

use crate::routes::Route;
use std::cmp;

const COLUMN_GAP: &str = "   ";

pub struct Table {
    headers: Vec<String>,
    min_widths: Vec<usize>,
    rows: Vec<Vec<String>>,
}

impl Table {
    /// Headers paired with the minimum width of their column.
    pub fn new(headers: &[(&str, usize)]) -> Self {
        Self {
            headers: headers.iter().map(|(h, _)| h.to_string()).collect(),
            min_widths: headers.iter().map(|(_, w)| *w).collect(),
            rows: Vec::new(),
        }
    }

    pub fn add_row(&mut self, row: Vec<String>) {
        if row.len() == self.headers.len() {
            self.rows.push(row);
        }
    }

    pub fn render(&self) -> String {
        let mut col_widths = self.min_widths.clone();
        for (i, header) in self.headers.iter().enumerate() {
            col_widths[i] = cmp::max(col_widths[i], header.chars().count());
        }
        for row in &self.rows {
            for (i, cell) in row.iter().enumerate() {
                col_widths[i] = cmp::max(col_widths[i], cell.chars().count());
            }
        }

        let format_row = |cells: &[String]| -> String {
            let padded: Vec<String> = cells
                .iter()
                .zip(&col_widths)
                .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
                .collect();
            padded.join(COLUMN_GAP).trim_end().to_string()
        };

        let rule_width: usize =
            col_widths.iter().sum::<usize>() + COLUMN_GAP.len() * col_widths.len();

        let mut out = String::new();
        out.push_str(&format_row(&self.headers));
        out.push('\n');
        out.push_str(&"-".repeat(rule_width));
        out.push('\n');
        for row in &self.rows {
            out.push_str(&format_row(row));
            out.push('\n');
        }
        out
    }
}

/// Route table followed by a blank line and the route count.
pub fn render_routes(routes: &[Route]) -> String {
    let mut table = Table::new(&[("Method", 6), ("Path", 4), ("Component", 9), ("Helper", 10)]);
    for route in routes {
        table.add_row(vec![
            route.method.clone(),
            route.path.clone(),
            route.component.clone(),
            route.helper.clone().unwrap_or_default(),
        ]);
    }

    let noun = if routes.len() == 1 { "route" } else { "routes" };
    format!("{}\nTotal: {} {}\n", table.render(), routes.len(), noun)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_routes_aligns_columns() {
        let routes = vec![
            Route {
                method: "GET".into(),
                path: "/users".into(),
                component: "UsersComponent".into(),
                helper: Some("users_path".into()),
            },
            Route {
                method: "DELETE".into(),
                path: "/users/:id".into(),
                component: "UserDelete".into(),
                helper: None,
            },
        ];
        let out = render_routes(&routes);
        let lines: Vec<&str> = out.lines().collect();

        assert_eq!(
            lines[0],
            "Method   Path         Component        Helper"
        );
        assert_eq!(lines[1], "-".repeat(6 + 10 + 14 + 10 + 12));
        assert_eq!(
            lines[2],
            "GET      /users       UsersComponent   users_path"
        );
        assert_eq!(lines[3], "DELETE   /users/:id   UserDelete");
        assert_eq!(lines[4], "");
        assert_eq!(lines[5], "Total: 2 routes");
    }

    #[test]
    fn test_single_route_is_singular() {
        let routes = vec![Route {
            method: "GET".into(),
            path: "/".into(),
            component: "Home".into(),
            helper: None,
        }];
        assert!(render_routes(&routes).ends_with("Total: 1 route\n"));
    }

    #[test]
    fn test_row_with_wrong_arity_is_dropped() {
        let mut table = Table::new(&[("A", 1), ("B", 1)]);
        table.add_row(vec!["only one".into()]);
        assert_eq!(table.render().lines().count(), 2);
    }
}
