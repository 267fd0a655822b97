//! Vivado project-creation script

use crate::manifest::{RunFlow, VivadoSettings};
use crate::sources::{FileKind, ResolvedSource, ResolvedSourceSet};
use crate::strategies::DEFAULT_SYNTH_RUN;
use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::path::Path;

const RULE: &str = "#******************************************************";

/// Untagged directives in emission order
const KIND_DIRECTIVES: &[(FileKind, &str)] = &[
    (FileKind::Vhdl, "read_vhdl -vhdl2008"),
    (FileKind::Verilog, "read_verilog"),
    (FileKind::SystemVerilog, "read_verilog -sv"),
    (FileKind::Ip, "read_ip"),
    (FileKind::Constraint, "read_xdc"),
    (FileKind::Unknown, "add_files"),
];

pub struct VivadoScript<'a> {
    settings: &'a VivadoSettings,
    sources: &'a ResolvedSourceSet,
    repo_root: &'a Path,
    repo_env: &'a str,
}

impl<'a> VivadoScript<'a> {
    pub fn new(
        settings: &'a VivadoSettings,
        sources: &'a ResolvedSourceSet,
        repo_root: &'a Path,
        repo_env: &'a str,
    ) -> Self {
        Self {
            settings,
            sources,
            repo_root,
            repo_env,
        }
    }

    pub fn render(&self) -> String {
        let mut lines: Vec<String> = Vec::new();

        lines.push(format!(
            "# Project script for '{}'. Generated by hdlforge, do not edit.",
            self.settings.project_name
        ));
        lines.push(String::new());

        self.section(&mut lines, |out| {
            out.push(format!("set project_name {}", tcl_word(&self.settings.project_name)));
            out.push(format!("set PART {}", tcl_word(&self.settings.part)));
            out.push(format!("set top_module {}", tcl_word(&self.settings.top_module)));
        });

        self.section(&mut lines, |out| {
            out.push(format!("set REPO_TOP $::env({})", self.repo_env));
            out.push("set ::REPO_TOP $REPO_TOP".to_string());
            for var in &self.settings.import_env {
                out.push(format!("set {} $::env({})", var, var));
                out.push(format!("set ::{} ${}", var, var));
            }
        });

        self.section(&mut lines, |out| {
            out.push("create_project -force $project_name -part $PART".to_string());
            out.push("set_property top $top_module [current_fileset]".to_string());
            if !self.settings.generics.is_empty() {
                out.push(format!(
                    "set_property generic {{{}}} [current_fileset]",
                    self.settings.generics.join(" ")
                ));
            }
            if !self.settings.defines.is_empty() {
                out.push(format!(
                    "set_property verilog_define {{{}}} [current_fileset]",
                    self.settings.defines.join(" ")
                ));
            }
        });

        self.section(&mut lines, |out| self.untagged(out));

        let filesets = self.filesets();
        if !filesets.is_empty() {
            self.section(&mut lines, |out| {
                for (name, members) in &filesets {
                    self.fileset(out, name, members);
                }
            });
        }

        let restricted: Vec<&ResolvedSource> = self
            .sources
            .iter()
            .filter(|s| s.kind != FileKind::Script && (s.synth_only || s.sim_only))
            .collect();
        if !restricted.is_empty() {
            self.section(&mut lines, |out| {
                for source in restricted {
                    let files = format!("[get_files {}]", self.path(&source.path));
                    if source.synth_only {
                        out.push(format!("set_property used_in_simulation false {}", files));
                    }
                    if source.sim_only {
                        out.push(format!("set_property used_in_synthesis false {}", files));
                    }
                }
            });
        }

        if !self.settings.code.is_empty() {
            self.section(&mut lines, |out| out.extend(self.settings.code.iter().cloned()));
        }

        if !self.settings.runs_flow.is_empty() {
            self.section(&mut lines, |out| self.runs(out));
        }

        let scripts: Vec<String> = self
            .sources
            .iter()
            .filter(|s| s.kind == FileKind::Script)
            .map(|s| format!("source {}", self.path(&s.path)))
            .collect();
        if !scripts.is_empty() {
            self.section(&mut lines, |out| out.extend(scripts));
        }

        let mut script = lines.join("\n");
        script.push('\n');
        script
    }

    fn section(&self, lines: &mut Vec<String>, body: impl FnOnce(&mut Vec<String>)) {
        lines.push(RULE.to_string());
        body(lines);
        lines.push(RULE.to_string());
        lines.push(String::new());
    }

    fn untagged(&self, out: &mut Vec<String>) {
        for (kind, directive) in KIND_DIRECTIVES {
            let paths: Vec<String> = self
                .sources
                .iter()
                .filter(|s| s.fileset.is_none() && s.kind == *kind)
                .map(|s| self.path(&s.path))
                .collect();
            if !paths.is_empty() {
                out.push(format!("{} {}", directive, tcl_list(&paths)));
            }
        }
    }

    /// Tagged non-script sources grouped by tag, in first-appearance order
    fn filesets(&self) -> Vec<(&'a str, Vec<&'a ResolvedSource>)> {
        let mut groups: Vec<(&str, Vec<&ResolvedSource>)> = Vec::new();
        for source in self.sources.iter().filter(|s| s.kind != FileKind::Script) {
            let Some(tag) = source.fileset.as_deref() else {
                continue;
            };
            match groups.iter_mut().find(|(name, _)| *name == tag) {
                Some((_, members)) => members.push(source),
                None => groups.push((tag, vec![source])),
            }
        }
        groups
    }

    fn fileset(&self, out: &mut Vec<String>, name: &str, members: &[&ResolvedSource]) {
        let kind = if members.iter().all(|s| s.kind == FileKind::Constraint) {
            "-constrset"
        } else {
            "-srcset"
        };
        let name = tcl_word(name);
        out.push(format!(
            "if {{[string equal [get_filesets -quiet {}] \"\"]}} {{ create_fileset {} {} }}",
            name, kind, name
        ));
        let paths: Vec<String> = members.iter().map(|s| self.path(&s.path)).collect();
        out.push(format!("add_files -fileset {} {}", name, tcl_list(&paths)));
    }

    fn runs(&self, out: &mut Vec<String>) {
        for (name, flow) in &self.settings.runs_flow {
            self.run(out, name, flow);
        }
        out.push(format!("delete_runs {}", DEFAULT_SYNTH_RUN));
    }

    fn run(&self, out: &mut Vec<String>, name: &str, flow: &RunFlow) {
        let synth = format!("{}_synth", name);
        out.push(format!(
            "create_run {} -flow {{{}}} -strategy {}",
            synth,
            self.settings.synth_flow,
            tcl_word(&flow.synth_strategy)
        ));
        for (j, strategy) in flow.impl_strategies.iter().enumerate() {
            out.push(format!(
                "create_run {}_impl_{} -parent_run {} -flow {{{}}} -strategy {}",
                name,
                j + 1,
                synth,
                self.settings.impl_flow,
                tcl_word(strategy)
            ));
        }
    }

    /// Quoted path with the repository prefix replaced by `$REPO_TOP`
    fn path(&self, path: &Path) -> String {
        match path.strip_prefix(self.repo_root) {
            Ok(rest) => format!("\"$REPO_TOP/{}\"", escape(&rest.display().to_string())),
            Err(_) => format!("\"{}\"", escape(&path.display().to_string())),
        }
    }
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '\\' | '"' | '$' | '[' | ']') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Brace a value that would otherwise split into several Tcl words
fn tcl_word(value: &str) -> String {
    if value.is_empty() || value.chars().any(|c| c.is_whitespace() || "{}\"[]$;\\".contains(c)) {
        format!("{{{}}}", value)
    } else {
        value.to_string()
    }
}

fn tcl_list(items: &[String]) -> String {
    if items.len() == 1 {
        return items[0].clone();
    }
    let mut out = String::from("[list \\\n");
    for item in items {
        let _ = writeln!(out, "    {} \\", item);
    }
    out.push(']');
    out
}

/// Run flows as printed by `list-runs` and by a missing `--flow`
pub fn describe_flows(flows: &BTreeMap<String, RunFlow>) -> Vec<String> {
    let mut lines = Vec::new();
    for (name, flow) in flows {
        lines.push(format!("{}:", name));
        lines.push(format!("  synth_strategy: {}", flow.synth_strategy));
        lines.push(format!("  impl_strategies: {}", flow.impl_strategies.join(", ")));
        lines.push(format!("  debug_probes: {}", flow.debug_probes));
        if !flow.parameters.is_empty() {
            lines.push(format!("  parameters: {}", flow.parameters.join(" ")));
        }
        if !flow.defines.is_empty() {
            lines.push(format!("  defines: {}", flow.defines.join(" ")));
        }
    }
    lines
}
