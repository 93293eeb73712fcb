// Copyright (C) 2023 Checkmk GmbH - License: GNU General Public License v2
// This file is part of Checkmk (https://checkmk.com). It is subject to the terms and
// conditions defined in the file COPYING, which is part of this source code package.

//! Man pages of check plugins and the catalog built from them.
//!
//! A man page is a line oriented `key: value` file. Lines which are empty or
//! start with a blank continue the value of the previous key:
//!
//! ```text
//! title: Linux: CPU load
//! agents: linux, aix
//! catalog: os/kernel
//! license: GPLv2
//! distribution: check_mk
//! description:
//!  This check measures the CPU load.
//! ```

use anyhow::{anyhow, bail, Context, Result};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManPage {
    pub name: String,
    pub path: PathBuf,
    pub title: String,
    pub agents: Vec<String>,
    pub catalog: Vec<String>,
    pub license: String,
    pub distribution: String,
    pub description: String,
    pub item: Option<String>,
    pub discovery: Option<String>,
    pub cluster: Option<String>,
}

impl ManPage {
    fn fallback(path: &Path, name: &str, msg: &str, content: &str) -> Self {
        Self {
            name: name.to_string(),
            path: path.to_owned(),
            title: format!("{}: Cannot parse man page: {}", name, msg),
            agents: vec![],
            catalog: vec!["generic".to_string()],
            license: "unknown".to_string(),
            distribution: "unknown".to_string(),
            description: content.to_string(),
            item: None,
            discovery: None,
            cluster: None,
        }
    }
}

pub type CatalogPath = Vec<String>;
pub type ManPageCatalog = BTreeMap<CatalogPath, Vec<ManPage>>;

const CATALOG_TITLES: &[(&str, &str)] = &[
    ("hw", "Appliances, other dedicated Hardware"),
    ("environment", "Environmental sensors"),
    ("time", "Clock Devices"),
    ("network", "Networking (Switches, Routers, etc.)"),
    ("cisco", "Cisco Systems (also IronPort)"),
    ("juniper", "Juniper Networks"),
    ("power", "Power supplies and PDUs"),
    ("apc", "APC"),
    ("printer", "Printers"),
    ("server", "Server hardware, blade enclosures"),
    ("storagehw", "Storage (filers, SAN, tape libs)"),
    ("netapp", "NetApp"),
    ("app", "Applications"),
    ("apache", "Apache Webserver"),
    ("checkmk", "Checkmk Monitoring System"),
    ("mssql", "Microsoft SQL Server"),
    ("mysql", "MySQL"),
    ("oracle", "ORACLE Database"),
    ("postgresql", "PostgreSQL"),
    ("os", "Operating Systems"),
    ("aix", "AIX"),
    ("linux", "Linux"),
    ("solaris", "Solaris"),
    ("windows", "Microsoft Windows"),
    ("snmp", "SNMP"),
    ("vsphere", "VMware ESX (via vSphere)"),
    ("hardware", "Hardware Sensors"),
    ("kernel", "CPU, Memory and Kernel Performance"),
    ("ps", "Processes, Services and Jobs"),
    ("files", "Files and Logfiles"),
    ("services", "Specific Daemons and Operating System Services"),
    ("networking", "Networking"),
    ("misc", "Miscellaneous"),
    ("storage", "Filesystems, Disks and RAID"),
    ("cloud", "Cloud Based Environments"),
    ("aws", "Amazon Web Services"),
    ("azure", "Microsoft Azure"),
    ("gcp", "Google Cloud Platform"),
    ("containerization", "Containerization"),
    ("docker", "Docker"),
    ("kubernetes", "Kubernetes"),
    ("agentless", "Networking checks without agent"),
    ("generic", "Generic check plugins"),
    ("unsorted", "Uncategorized"),
];

pub fn catalog_title(name: &str) -> &str {
    CATALOG_TITLES
        .iter()
        .find(|(key, _)| *key == name)
        .map_or(name, |(_, title)| *title)
}

fn is_valid_basename(name: &str) -> bool {
    !name.starts_with('.') && !name.ends_with('~')
}

/// Maps man page names to files. Pages found in earlier directories win.
pub fn make_man_page_path_map(dirs: &[PathBuf]) -> BTreeMap<String, PathBuf> {
    let mut map = BTreeMap::new();
    for dir in dirs.iter().rev() {
        for entry in WalkDir::new(dir).into_iter().filter_map(|e| match e {
            Ok(e) => Some(e),
            Err(err) => {
                log::warn!("Skipping man page entry: {}", err);
                None
            }
        }) {
            if !entry.file_type().is_file() {
                continue;
            }
            let Some(name) = entry.file_name().to_str() else {
                continue;
            };
            if is_valid_basename(name) {
                map.insert(name.to_string(), entry.into_path());
            }
        }
    }
    map
}

pub fn get_title_from_man_page(path: &Path) -> Result<String> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Can't read man page {}", path.display()))?;
    content
        .lines()
        .find_map(|line| line.strip_prefix("title:"))
        .map(|title| title.trim().to_string())
        .ok_or_else(|| anyhow!("Invalid man page: Failed to get the title"))
}

/// Rows of `(name, title)`, plus an error text for every unreadable page.
pub fn man_page_table(
    path_map: &BTreeMap<String, PathBuf>,
) -> (Vec<(String, String)>, Vec<String>) {
    let mut rows = vec![];
    let mut errors = vec![];
    for (name, path) in path_map {
        match get_title_from_man_page(path) {
            Ok(title) => rows.push((name.clone(), title)),
            Err(e) => errors.push(format!("ERROR: {}: {}", name, e)),
        }
    }
    (rows, errors)
}

pub fn parse_man_page(name: &str, path: &Path, debug: bool) -> Result<ManPage> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Can't read man page {}", path.display()))?;
    match man_page_from_content(name, path, &content) {
        Ok(page) => Ok(page),
        Err(e) if debug => Err(e),
        Err(e) => {
            log::warn!("{}", e);
            Ok(ManPage::fallback(path, name, &e.to_string(), &content))
        }
    }
}

fn man_page_from_content(name: &str, path: &Path, content: &str) -> Result<ManPage> {
    let mut parsed = parse_to_raw(path, content)?;
    let mut take = |key: &str| {
        parsed
            .remove(key)
            .ok_or_else(|| anyhow!("Missing key '{}'", key))
    };
    let title = take("title")?;
    let agents = take("agents")?;
    let license = take("license")?;
    let distribution = take("distribution")?;
    let description = take("description")?;
    let catalog = take("catalog")?;
    let item = take("item").ok();
    let discovery = take("discovery")
        .ok()
        .filter(|d| !d.is_empty())
        .or_else(|| take("inventory").ok());
    let cluster = take("cluster").ok();

    Ok(ManPage {
        name: name.to_string(),
        path: path.to_owned(),
        title,
        agents: agents.replace(' ', "").split(',').map(str::to_string).collect(),
        catalog: catalog.split('/').map(str::to_string).collect(),
        license,
        distribution,
        description,
        item,
        discovery,
        cluster,
    })
}

pub fn parse_to_raw(path: &Path, content: &str) -> Result<HashMap<String, String>> {
    let mut parsed: HashMap<String, Vec<String>> = HashMap::new();
    let mut current: Option<String> = None;

    for (no, line) in content.lines().enumerate() {
        if line.trim().is_empty() || line.starts_with(' ') {
            // continuation, lines before the first key are dropped
            if let Some(key) = &current {
                parsed
                    .entry(key.clone())
                    .or_default()
                    .push(line.trim().to_string());
            }
            continue;
        }

        let Some((key, rest)) = line.split_once(':') else {
            bail!(
                "Syntax error in {} line {} (missing ':').",
                path.display(),
                no + 1
            );
        };
        parsed
            .entry(key.to_string())
            .or_default()
            .push(rest.trim().to_string());
        current = Some(key.to_string());
    }

    Ok(parsed
        .into_iter()
        .map(|(k, v)| (k, v.join("\n").trim().to_string()))
        .collect())
}

fn make_catalog_entries(page_catalog: &[String], agents: &[String]) -> Vec<CatalogPath> {
    if page_catalog.first().map(String::as_str) == Some("os") {
        agents
            .iter()
            .map(|agent| {
                let mut path = vec!["os".to_string(), agent.clone()];
                path.extend_from_slice(&page_catalog[1..]);
                path
            })
            .collect()
    } else {
        vec![page_catalog.to_vec()]
    }
}

pub fn load_man_page_catalog(
    path_map: &BTreeMap<String, PathBuf>,
    debug: bool,
) -> Result<ManPageCatalog> {
    let mut catalog = ManPageCatalog::new();
    for (name, path) in path_map {
        let page = parse_man_page(name, path, debug)?;
        for entry in make_catalog_entries(&page.catalog, &page.agents) {
            catalog.entry(entry).or_default().push(page.clone());
        }
    }
    Ok(catalog)
}

pub fn subtree_names(catalog: &ManPageCatalog, category: &[String]) -> Vec<String> {
    catalog
        .keys()
        .filter(|c| c.len() > category.len() && c.starts_with(category))
        .map(|c| c[category.len()].clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

pub fn num_entries(catalog: &ManPageCatalog, category: &[String]) -> usize {
    catalog
        .iter()
        .filter(|(c, _)| c.starts_with(category))
        .map(|(_, e)| e.len())
        .sum()
}

pub fn display_header(category: &[String]) -> String {
    category
        .iter()
        .map(|c| catalog_title(c))
        .collect::<Vec<_>>()
        .join(" -> ")
}

/// What the catalog shows for one path.
#[derive(Debug, PartialEq)]
pub enum CatalogView<'a> {
    /// Pages sorted by title, then name.
    Entries(Vec<&'a ManPage>),
    /// `(title with count, folder name)` sorted by title.
    Folders(Vec<(String, String)>),
    Empty,
}

pub fn browse<'a>(catalog: &'a ManPageCatalog, category: &[String]) -> (CatalogView<'a>, bool) {
    let entries = catalog.get(category).map(Vec::as_slice).unwrap_or_default();
    let subtrees = subtree_names(catalog, category);
    let conflict = !entries.is_empty() && !subtrees.is_empty();

    let view = if !entries.is_empty() {
        let mut pages: Vec<&ManPage> = entries.iter().collect();
        pages.sort_by(|a, b| (&a.title, &a.name).cmp(&(&b.title, &b.name)));
        pages.dedup_by(|a, b| a.name == b.name);
        CatalogView::Entries(pages)
    } else if !subtrees.is_empty() {
        let mut titles: Vec<(String, String)> = subtrees
            .into_iter()
            .map(|name| {
                let mut sub = category.to_vec();
                sub.push(name.clone());
                let title = match num_entries(catalog, &sub) {
                    0 => catalog_title(&name).to_string(),
                    count => format!("{} ({})", catalog_title(&name), count),
                };
                (title, name)
            })
            .collect();
        titles.sort();
        CatalogView::Folders(titles)
    } else {
        CatalogView::Empty
    };
    (view, conflict)
}
