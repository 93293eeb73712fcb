// Copyright (C) 2023 Checkmk GmbH - License: GNU General Public License v2
// This file is part of Checkmk (https://checkmk.com). It is subject to the terms and
// conditions defined in the file COPYING, which is part of this source code package.
use check_exec::{modes, setup};

fn main() {
    let code = match setup::init(std::env::args_os()) {
        Ok(env) => match modes::run(&env.args, &env.config, &mut std::io::stdout()) {
            Ok(code) => {
                log::info!("Success");
                code
            }
            Err(e) => {
                display_and_log(e);
                1
            }
        },
        Err(e) => {
            display_and_log(e);
            1
        }
    };
    std::process::exit(code);
}

fn display_and_log(e: impl std::fmt::Display) {
    log::error!("{e}");
    eprintln!("Stop on error: `{e}`");
}
