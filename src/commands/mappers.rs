//! Mappers command

use clap::Args;

use ackbridge_mappers::{MapperRegistry, ResourceMapper};

use crate::Result;

const HEADERS: &[&str] = &["TYPE", "KIND", "NAME FIELD", "REF", "EXPORTS"];

#[derive(Args, Debug)]
pub struct MappersArgs {
    /// Print one JSON object per mapper instead of a table
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: MappersArgs) -> Result<()> {
    let registry = MapperRegistry::with_defaults();
    if args.json {
        for mapper in registry.iter() {
            println!("{}", describe(mapper));
        }
    } else {
        let rows: Vec<Vec<String>> = registry.iter().map(row).collect();
        print!("{}", render_table(HEADERS, &rows));
    }
    Ok(())
}

fn row(mapper: &dyn ResourceMapper) -> Vec<String> {
    let exports: Vec<_> = mapper.export_mappings().iter().map(|e| e.attribute).collect();
    vec![
        mapper.resource_type().to_string(),
        mapper.target_kind().to_string(),
        mapper.name_mapping().cfn_property.to_string(),
        mapper.ref_mapping().to_string(),
        if exports.is_empty() {
            "-".to_string()
        } else {
            exports.join(",")
        },
    ]
}

/// Column-aligned table, one line per row after the header line
fn render_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.len());
        }
    }

    let line = |cells: Vec<&str>| -> String {
        let padded: Vec<String> = cells
            .iter()
            .enumerate()
            .map(|(i, cell)| {
                let w = widths.get(i).copied().unwrap_or(0);
                format!("{:<width$}", cell, width = w)
            })
            .collect();
        format!("{}\n", padded.join("  ").trim_end())
    };

    let mut out = line(headers.to_vec());
    for row in rows {
        out.push_str(&line(row.iter().map(String::as_str).collect()));
    }
    out
}

fn describe(mapper: &dyn ResourceMapper) -> serde_json::Value {
    let name = mapper.name_mapping();
    serde_json::json!({
        "type": mapper.resource_type(),
        "kind": mapper.target_kind(),
        "nameField": name.cfn_property,
        "specPath": name.spec_path,
        "ref": mapper.ref_mapping().to_string(),
        "exports": mapper
            .export_mappings()
            .iter()
            .map(|e| serde_json::json!({"attribute": e.attribute, "field": e.field}))
            .collect::<Vec<_>>(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_rds() {
        let registry = MapperRegistry::with_defaults();
        let described = describe(registry.try_find("AWS::RDS::DBInstance").unwrap());
        assert_eq!(described["kind"], "DBInstance");
        assert_eq!(described["specPath"], "/spec/dbInstanceIdentifier");
        assert_eq!(described["ref"], "name");
        assert_eq!(described["exports"][1]["field"], "endpoint.port");
    }

    #[test]
    fn test_rows_cover_registry() {
        let registry = MapperRegistry::with_defaults();
        let rows: Vec<_> = registry.iter().map(row).collect();
        assert_eq!(rows.len(), 7);
        let rds = rows.iter().find(|r| r[0] == "AWS::RDS::DBInstance").unwrap();
        assert_eq!(rds[4], "Endpoint.Address,Endpoint.Port");
        let bucket = rows.iter().find(|r| r[0] == "AWS::S3::Bucket").unwrap();
        assert_eq!(bucket[4], "-");
    }

    #[test]
    fn test_table_columns_align() {
        let table = render_table(
            &["A", "B"],
            &[
                vec!["long-cell".to_string(), "x".to_string()],
                vec!["s".to_string(), "y".to_string()],
            ],
        );
        let lines: Vec<_> = table.lines().collect();
        assert_eq!(lines[0], "A          B");
        assert_eq!(lines[1], "long-cell  x");
        assert_eq!(lines[2], "s          y");
    }

    #[test]
    fn test_table_headers_only() {
        assert_eq!(render_table(&["A", "B"], &[]), "A  B\n");
    }
}
