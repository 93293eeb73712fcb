// Copyright (C) 2023 Checkmk GmbH - License: GNU General Public License v2
// This file is part of Checkmk (https://checkmk.com). It is subject to the terms and
// conditions defined in the file COPYING, which is part of this source code package.

use crate::args::{Args, ManPagesMode, Mode};
use crate::config::ExecConfig;
use crate::man_pages::{self, CatalogView};
use crate::wrapper::HostConfigLookup;
use anyhow::{bail, Result};
use std::io::Write;
use std::path::PathBuf;

pub fn run(args: &Args, config: &ExecConfig, out: &mut dyn Write) -> Result<i32> {
    let debug = args.debug || config.debug();
    match &args.mode {
        Mode::ExitSpec { host } => {
            writeln!(out, "{}", config.exit_code_spec(host))?;
            Ok(0)
        }
        Mode::ManPages(ManPagesMode::Table { dirs }) => man_page_table(dirs, out),
        Mode::ManPages(ManPagesMode::Catalog { dirs, path }) => {
            man_page_catalog(dirs, path, debug, out)
        }
    }
}

fn man_page_table(dirs: &[PathBuf], out: &mut dyn Write) -> Result<i32> {
    let path_map = man_pages::make_man_page_path_map(dirs);
    let (rows, errors) = man_pages::man_page_table(&path_map);
    for e in &errors {
        log::error!("{}", e);
        eprintln!("{}", e);
    }

    let header = ("Check type", "Title");
    let width = rows
        .iter()
        .map(|(name, _)| name.len())
        .chain(std::iter::once(header.0.len()))
        .max()
        .unwrap_or_default();
    writeln!(out, "{:<width$}  {}", header.0, header.1)?;
    for (name, title) in rows {
        writeln!(out, "{:<width$}  {}", name, title)?;
    }
    Ok(if errors.is_empty() { 0 } else { 1 })
}

fn man_page_catalog(
    dirs: &[PathBuf],
    path: &[String],
    debug: bool,
    out: &mut dyn Write,
) -> Result<i32> {
    let path_map = man_pages::make_man_page_path_map(dirs);
    let catalog = man_pages::load_man_page_catalog(&path_map, debug)?;
    let (view, conflict) = man_pages::browse(&catalog, path);
    if conflict {
        eprintln!(
            "ERROR: Catalog path {} contains man pages and subfolders.",
            path.join("/")
        );
    }

    let header = man_pages::display_header(path);
    if !header.is_empty() {
        writeln!(out, "{}", header)?;
    }
    match view {
        CatalogView::Entries(pages) => {
            for (num, page) in pages.iter().enumerate() {
                writeln!(out, "{:>3} {} ({})", num + 1, page.title, page.name)?;
            }
        }
        CatalogView::Folders(titles) => {
            for (num, (title, _name)) in titles.iter().enumerate() {
                writeln!(out, "{:>3} {}", num + 1, title)?;
            }
        }
        CatalogView::Empty => bail!("Catalog path '{}' does not exist", path.join("/")),
    }
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::fs;

    fn run_with(args: &[&str], config: &ExecConfig) -> (i32, String) {
        let args = Args::parse_from(args);
        let mut out = Vec::new();
        let code = run(&args, config, &mut out).unwrap();
        (code, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_exit_spec() {
        let source = "exec:\n  hosts:\n    - name: h\n      exit_spec:\n        timeout: 0\n";
        let config = ExecConfig::from_string(source).unwrap();
        assert_eq!(
            run_with(&["check-exec", "exit-spec", "h"], &config),
            (0, "timeout=0 connection=2 exception=3\n".to_string())
        );
    }

    #[test]
    fn test_table() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("df"), "title: Filesystems\n").unwrap();
        fs::write(dir.path().join("cpu_loads"), "title: CPU load\n").unwrap();
        let dir_arg = dir.path().to_str().unwrap();
        let (code, out) = run_with(
            &["check-exec", "man-pages", "table", "--dir", dir_arg],
            &ExecConfig::default(),
        );
        assert_eq!(code, 0);
        assert_eq!(
            out,
            "Check type  Title\ncpu_loads   CPU load\ndf          Filesystems\n"
        );
    }
}
