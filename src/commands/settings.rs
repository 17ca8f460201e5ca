// Copyright (c) 2025 Spendwatch.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use rusqlite::Connection;

use crate::db;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("show", _)) => {
            println!("{}", db::get_default_currency(conn)?);
        }
        Some(("set", sub)) => {
            let code = sub.get_one::<String>("code").unwrap().to_uppercase();
            db::set_default_currency(conn, &code)?;
            println!("Default currency set to {}", code);
        }
        _ => {}
    }
    Ok(())
}
