// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Front-end services: settings location, image intake and option merging.

pub mod config_dir;
pub mod intake;
pub mod options;
