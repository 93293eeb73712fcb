// Copyright (C) 2023 Checkmk GmbH - License: GNU General Public License v2
// This file is part of Checkmk (https://checkmk.com). It is subject to the terms and
// conditions defined in the file COPYING, which is part of this source code package.

use assert_cmd::Command;
use std::path::{Path, PathBuf};

pub fn setup_test_dir(prefix: &str) -> tempfile::TempDir {
    tempfile::Builder::new().prefix(prefix).tempdir().unwrap()
}

pub fn check_exec_command() -> Command {
    let mut cmd = Command::cargo_bin("check-exec").unwrap();
    // keep the developer's environment out of the tests
    cmd.env_remove("MK_CONFDIR")
        .env_remove("MK_LOGDIR")
        .env_remove("MK_TEMPDIR");
    cmd
}

pub fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(&path, content).unwrap();
    path
}

pub fn man_page(title: &str, agents: &str, catalog: &str) -> String {
    format!(
        "title: {title}\nagents: {agents}\ncatalog: {catalog}\nlicense: GPLv2\n\
         distribution: check_mk\ndescription:\n This is {title}.\n"
    )
}
