// Copyright (C) 2023 Checkmk GmbH - License: GNU General Public License v2
// This file is part of Checkmk (https://checkmk.com). It is subject to the terms and
// conditions defined in the file COPYING, which is part of this source code package.

pub mod args;
pub mod checking_types;
pub mod classifier;
pub mod config;
pub mod constants;
pub mod crash;
pub mod exit_spec;
pub mod failure;
pub mod keepalive;
pub mod man_pages;
pub mod modes;
pub mod output;
pub mod setup;
pub mod wrapper;
