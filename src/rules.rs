//! The league constitution shown on the League Rules tab.

pub struct RuleSection {
    pub title: &'static str,
    pub items: &'static [&'static str],
}

pub const LEAGUE_RULES: &[RuleSection] = &[
    RuleSection {
        title: "Scoring",
        items: &[
            "Format: 1/2 Point PPR",
            "Passing Yards: 25 yards = 1 point",
            "Passing Touchdown: 4 points",
            "Interceptions: -2 points",
            "Rushing Yards: 10 yards = 1 point",
            "Receiving Yards: 10 yards = 1 point",
            "Receptions: 0.5 points",
            "Receiving Touchdowns: 6 points",
            "Return Touchdowns: 6 points",
            "2 Point Conversions: 2 points",
            "Fumbles Lost: -2 points",
            "Offensive Fumble Return TD: 6 points",
            "FG 0-39 yards: 3 points",
            "FG 40-49 yards: 4 points",
            "FG 50+ yards: 5 points",
            "Extra Point Made: 1 point",
            "DEF Sack: 1 point",
            "DEF Interception: 2 points",
            "DEF Fumble Recovery: 2 points",
            "DEF Touchdown: 6 points",
            "DEF Safety: 2 points",
            "DEF Block Kick: 2 points",
            "DEF Kick/Punt Return TD: 6 points",
            "Points Allowed 0: 10 points",
            "Points Allowed 1-6: 7 points",
            "Points Allowed 7-13: 4 points",
            "Points Allowed 14-20: 1 point",
            "Points Allowed 21-27: 0 points",
            "Points Allowed 28-34: -2 points",
            "Points Allowed 35+: -4 points",
        ],
    },
    RuleSection {
        title: "Rosters",
        items: &[
            "Starting Lineup: 1 QB, 2 WR, 2 RB, 1 TE, 1 Flex (W/R/T), 1 K, 1 DEF",
            "Bench: 5 BN, 1 IR",
        ],
    },
    RuleSection {
        title: "Draft",
        items: &[
            "Type: Online Live Snake",
            "Time: Weekend before Labor Day",
            "Order: Determined via simulator",
            "Pick Time: 60 seconds",
            "Keeper: 1 optional",
        ],
    },
    RuleSection {
        title: "Regular Season",
        items: &["1 Division", "14 Weeks (Weeks 1-14)", "Tiebreaker: Points For"],
    },
    RuleSection {
        title: "Playoffs",
        items: &[
            "6 Teams",
            "3 Weeks (Weeks 15-17)",
            "Top 2 seeds get a 1st-round bye",
            "No high score payouts during playoffs",
        ],
    },
    RuleSection {
        title: "Keepers",
        items: &[
            "Keep 1 player from previous year (optional)",
            "Must be 7th-round pick or later in prior draft",
            "Must be on end-of-season roster",
            "If undrafted: costs your last pick",
            "Cannot be kept in consecutive years",
        ],
    },
    RuleSection {
        title: "Waivers",
        items: &[
            "Format: FAAB",
            "Waiver Time: 2 days after drop",
            "Pickup Day: Wednesday morning",
            "Max Acquisitions: None ($0 bids allowed)",
        ],
    },
    RuleSection {
        title: "Trades",
        items: &[
            "Deadline: Saturday before Week 11",
            "Review: Commissioner",
            "Veto Time: 1 day",
        ],
    },
    RuleSection {
        title: "Rewards & Punishments",
        items: &[
            "$60 Buy-in",
            "Weekly High Score: $30",
            "League Champion: $290 + Trophy w/ Nameplate",
            "Loser: Calendar + Loser Trophy",
        ],
    },
    RuleSection {
        title: "Rule Changes",
        items: &[
            "May be proposed before draft",
            "Needs 1 second to go to a vote",
            "Simple majority passes (Commissioner breaks ties)",
        ],
    },
];
