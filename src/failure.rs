// Copyright (C) 2023 Checkmk GmbH - License: GNU General Public License v2
// This file is part of Checkmk (https://checkmk.com). It is subject to the terms and
// conditions defined in the file COPYING, which is part of this source code package.

//! Failures a check body may raise.
//!
//! Every failure ends up either classified into the service output or, for
//! [`CheckFailure::Terminated`] and (in keepalive mode) [`CheckFailure::Timeout`],
//! handed back to the caller of the wrapper unchanged.

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommunicationKind {
    Agent,
    Snmp,
    AddressLookup,
}

#[derive(Debug, Error)]
pub enum CheckFailure {
    #[error("Terminated")]
    Terminated,

    #[error("Timed out")]
    Timeout,

    #[error("{message}")]
    Communication {
        kind: CommunicationKind,
        message: String,
    },

    #[error("{0}")]
    Application(String),

    #[error(transparent)]
    Unclassified(#[from] anyhow::Error),
}

impl CheckFailure {
    pub fn agent(message: impl Into<String>) -> Self {
        Self::Communication {
            kind: CommunicationKind::Agent,
            message: message.into(),
        }
    }

    pub fn snmp(message: impl Into<String>) -> Self {
        Self::Communication {
            kind: CommunicationKind::Snmp,
            message: message.into(),
        }
    }

    pub fn address_lookup(message: impl Into<String>) -> Self {
        Self::Communication {
            kind: CommunicationKind::AddressLookup,
            message: message.into(),
        }
    }

    pub fn application(message: impl Into<String>) -> Self {
        Self::Application(message.into())
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout)
    }

    pub fn is_terminated(&self) -> bool {
        matches!(self, Self::Terminated)
    }
}
