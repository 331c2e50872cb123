//! Graphviz rendering of the dependency graph
//!
//! Groups build configurations by project (cluster per project), created
//! packages by publishing configuration (nested cluster), and consuming
//! configurations as plain nodes, then appends the derived edge list.

use crate::api::graph::Edge;
use crate::primitives::Project;
use std::fmt;

const COLOR_SCHEME: &str = "brbg3";

/// Render the dot description of the resolved graph.
///
/// Entities whose `uses_nuget()` is false are invisible: no cluster, no
/// node, no edges.
pub fn write_graph<W: fmt::Write>(
    out: &mut W,
    projects: &[Project],
    edges: &[Edge],
) -> fmt::Result {
    writeln!(out, "digraph builds {{colorscheme={};", COLOR_SCHEME)?;
    writeln!(
        out,
        "  node [fontname = \"Helvetica\", style=\"rounded,filled\", shape=box, color=1, colorscheme={}];",
        COLOR_SCHEME
    )?;
    writeln!(
        out,
        "  graph [fontname = \"Helvetica-Bold\", style=\"rounded,filled\", shape=box, color=3, colorscheme={}];",
        COLOR_SCHEME
    )?;
    writeln!(out, "  edge [fontname = \"Helvetica\"];")?;
    writeln!(out, "  rankdir = LR;")?;
    writeln!(out)?;

    for project in projects.iter().filter(|p| p.uses_nuget()) {
        writeln!(
            out,
            "  subgraph \"cluster_project_{}\" {{",
            escape(&project.id)
        )?;
        writeln!(out, "    label = \"{}\";", escape(&project.name))?;

        for build_type in project.build_types.values().filter(|bt| bt.uses_nuget()) {
            if build_type.publishes_packages() {
                writeln!(
                    out,
                    "    subgraph \"cluster_buildType_{}\" {{",
                    escape(&build_type.id)
                )?;
                writeln!(
                    out,
                    "      label = \"{}\"; color=2;",
                    escape(&build_type.name)
                )?;

                for build in build_type.builds.values().filter(|b| b.uses_nuget()) {
                    for package in build.created_packages.values() {
                        writeln!(out, "        \"{}\";", escape(&package.version_id.id))?;
                    }
                }

                writeln!(out, "    }}")?;
            } else {
                writeln!(
                    out,
                    "      \"{}\" [label=\"{}\", color=2];",
                    escape(&build_type.id),
                    escape(&build_type.name)
                )?;
            }
        }

        writeln!(out, "  }}")?;
    }

    writeln!(out)?;
    for edge in edges {
        writeln!(
            out,
            "  \"{}\" -> \"{}\";",
            escape(&edge.source),
            escape(&edge.target)
        )?;
    }

    writeln!(out, "}}")?;
    Ok(())
}

/// Escape a value for use inside a double-quoted dot ID
fn escape(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

#[cfg(test)]
mod tests {
    include!("dot.test.rs");
}
