// Copyright (c) 2025 Spendwatch.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, value_parser};

fn json_flags(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print as pretty JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .help("Print as JSON lines"),
    )
}

pub fn build_cli() -> Command {
    Command::new("spendwatch")
        .about("Personal finance tracking with budget alerts, savings goals, and recurring items")
        .version(clap::crate_version!())
        .subcommand_required(false)
        .subcommand(Command::new("init").about("Initialize the database"))
        .subcommand(
            Command::new("tx")
                .about("Manage transactions")
                .subcommand(
                    Command::new("add")
                        .about("Record a transaction")
                        .arg(Arg::new("date").long("date").required(true).help(
                            "Occurrence date, YYYY-MM-DD or 'YYYY-MM-DD HH:MM'",
                        ))
                        .arg(
                            Arg::new("amount")
                                .long("amount")
                                .required(true)
                                .allow_hyphen_values(true),
                        )
                        .arg(
                            Arg::new("kind")
                                .long("kind")
                                .required(true)
                                .help("income|expense"),
                        )
                        .arg(Arg::new("category").long("category").required(true))
                        .arg(Arg::new("description").long("description").required(true))
                        .arg(
                            Arg::new("tags")
                                .long("tags")
                                .help("Comma-separated tag list"),
                        )
                        .arg(Arg::new("note").long("note"))
                        .arg(Arg::new("currency").long("currency")),
                )
                .subcommand(json_flags(
                    Command::new("list")
                        .about("List transactions")
                        .arg(Arg::new("month").long("month").help("Filter by YYYY-MM"))
                        .arg(Arg::new("category").long("category"))
                        .arg(Arg::new("kind").long("kind").help("income|expense"))
                        .arg(
                            Arg::new("limit")
                                .long("limit")
                                .value_parser(value_parser!(usize)),
                        ),
                ))
                .subcommand(
                    Command::new("delete").about("Delete a transaction").arg(
                        Arg::new("id")
                            .long("id")
                            .required(true)
                            .value_parser(value_parser!(i64)),
                    ),
                )
                .subcommand(
                    Command::new("replace")
                        .about("Replace a transaction wholesale (copy-with-override)")
                        .arg(
                            Arg::new("id")
                                .long("id")
                                .required(true)
                                .value_parser(value_parser!(i64)),
                        )
                        .arg(Arg::new("date").long("date"))
                        .arg(Arg::new("amount").long("amount").allow_hyphen_values(true))
                        .arg(Arg::new("kind").long("kind"))
                        .arg(Arg::new("category").long("category"))
                        .arg(Arg::new("description").long("description"))
                        .arg(Arg::new("tags").long("tags"))
                        .arg(Arg::new("note").long("note"))
                        .arg(Arg::new("currency").long("currency")),
                ),
        )
        .subcommand(
            Command::new("budget")
                .about("Manage monthly budgets")
                .subcommand(
                    Command::new("set")
                        .about("Create a budget for a category and month")
                        .arg(Arg::new("category").long("category").required(true))
                        .arg(Arg::new("limit").long("limit").required(true))
                        .arg(
                            Arg::new("month")
                                .long("month")
                                .required(true)
                                .help("YYYY-MM"),
                        )
                        .arg(
                            Arg::new("threshold")
                                .long("threshold")
                                .help("Alert percentage 0-100, default 80"),
                        ),
                )
                .subcommand(json_flags(
                    Command::new("list")
                        .about("List budgets")
                        .arg(Arg::new("month").long("month").help("Filter by YYYY-MM")),
                ))
                .subcommand(json_flags(
                    Command::new("status")
                        .about("Spending against budgets for a month")
                        .arg(
                            Arg::new("month")
                                .long("month")
                                .required(true)
                                .help("YYYY-MM"),
                        ),
                )),
        )
        .subcommand(
            Command::new("goal")
                .about("Manage savings goals")
                .subcommand(
                    Command::new("add")
                        .about("Create a savings goal")
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(Arg::new("target").long("target").required(true))
                        .arg(
                            Arg::new("date")
                                .long("date")
                                .required(true)
                                .help("Target date YYYY-MM-DD"),
                        )
                        .arg(Arg::new("color").long("color")),
                )
                .subcommand(json_flags(Command::new("list").about("List goals with progress")))
                .subcommand(
                    Command::new("contribute")
                        .about("Add to a goal's saved amount")
                        .arg(
                            Arg::new("id")
                                .long("id")
                                .required(true)
                                .value_parser(value_parser!(i64)),
                        )
                        .arg(
                            Arg::new("amount")
                                .long("amount")
                                .required(true)
                                .allow_hyphen_values(true),
                        ),
                ),
        )
        .subcommand(
            Command::new("recurring")
                .about("Manage recurring items")
                .subcommand(
                    Command::new("add")
                        .about("Create a recurring item")
                        .arg(Arg::new("amount").long("amount").required(true))
                        .arg(
                            Arg::new("kind")
                                .long("kind")
                                .required(true)
                                .help("income|expense"),
                        )
                        .arg(Arg::new("category").long("category").required(true))
                        .arg(Arg::new("description").long("description").required(true))
                        .arg(
                            Arg::new("frequency")
                                .long("frequency")
                                .required(true)
                                .help("daily|weekly|monthly|quarterly|annually"),
                        )
                        .arg(
                            Arg::new("due")
                                .long("due")
                                .required(true)
                                .help("Next due date YYYY-MM-DD"),
                        )
                        .arg(Arg::new("currency").long("currency")),
                )
                .subcommand(json_flags(Command::new("list").about("List recurring items")))
                .subcommand(json_flags(
                    Command::new("due")
                        .about("List items due on or before a date")
                        .arg(Arg::new("on").long("on").help("Reference date, default today")),
                ))
                .subcommand(
                    Command::new("pay")
                        .about("Mark an item paid and advance its due date")
                        .arg(
                            Arg::new("id")
                                .long("id")
                                .required(true)
                                .value_parser(value_parser!(i64)),
                        ),
                ),
        )
        .subcommand(
            Command::new("alert")
                .about("Budget and recurring-item notifications")
                .subcommand(
                    Command::new("check")
                        .about("Evaluate budgets and recurring items, recording new alerts")
                        .arg(Arg::new("on").long("on").help("Reference date, default today")),
                )
                .subcommand(json_flags(
                    Command::new("list").about("List notifications").arg(
                        Arg::new("unread")
                            .long("unread")
                            .action(ArgAction::SetTrue)
                            .help("Only unread"),
                    ),
                ))
                .subcommand(
                    Command::new("read")
                        .about("Mark notifications read")
                        .arg(Arg::new("id").long("id").value_parser(value_parser!(i64)))
                        .arg(
                            Arg::new("all")
                                .long("all")
                                .action(ArgAction::SetTrue)
                                .help("Mark everything read"),
                        ),
                ),
        )
        .subcommand(
            Command::new("report")
                .about("Aggregated views")
                .subcommand(json_flags(
                    Command::new("cashflow")
                        .about("Income vs expenses bucketed by period")
                        .arg(
                            Arg::new("granularity")
                                .long("granularity")
                                .default_value("monthly")
                                .help("weekly|monthly|yearly"),
                        )
                        .arg(
                            Arg::new("last")
                                .long("last")
                                .value_parser(value_parser!(usize))
                                .help("Only the most recent N buckets"),
                        ),
                ))
                .subcommand(json_flags(
                    Command::new("spend-by-category")
                        .about("Expense totals per category for a month")
                        .arg(
                            Arg::new("month")
                                .long("month")
                                .required(true)
                                .help("YYYY-MM"),
                        ),
                )),
        )
        .subcommand(
            Command::new("export").about("Export data").subcommand(
                Command::new("transactions")
                    .about("Export transactions to a file")
                    .arg(
                        Arg::new("format")
                            .long("format")
                            .default_value("csv")
                            .help("csv|json"),
                    )
                    .arg(Arg::new("out").long("out").required(true)),
            ),
        )
        .subcommand(
            Command::new("currency")
                .about("Default currency for new records")
                .subcommand(Command::new("show").about("Show the default currency"))
                .subcommand(
                    Command::new("set")
                        .about("Set the default currency")
                        .arg(Arg::new("code").required(true).help("ISO 4217 code")),
                ),
        )
        .subcommand(Command::new("doctor").about("Check the store for suspicious records"))
}
