//! Rule tables for the six built-in detector families
//!
//! This module is configuration, not logic: each table is a list of
//! (pattern, weight, label, rationale, span cap) tuples consumed by the
//! generic [`Detector`]. Patterns are matched case-insensitively with
//! `.` crossing newlines, so a rule can tie a function header to a
//! `revert` many lines below; every long-range gap uses a bounded lazy
//! window (`[\s\S]{0,N}?`) and a span cap keeps hit text finite on
//! obfuscated input.
//!
//! Family ids follow the STE taxonomy the rule content was curated
//! under: STE0101_* exit restrictions, STE0103 proxy-upgrade rug,
//! STE0104 unlimited mint, STE0105 deposit trap.

use crate::detectors::base::{Detector, RuleSpec};
use crate::scoring::Strategy;

const SELL_PATH_RULES: &[RuleSpec] = &[
    RuleSpec {
        id: "dex_revert",
        pattern: r"(to|recipient|_to)\s*==\s*.{0,80}?(pair|router|pool|dex|swap|pancake|uniswap|sushi).{0,40}?\).{0,20}?\{[\s\S]{0,100}?(revert|require\s*\(\s*false|return\s+false)",
        weight: 100,
        label: "Sell-Path Block",
        rationale: "Transfers to a DEX address revert outright: holders can buy but never sell",
        max_span: 300,
    },
    RuleSpec {
        id: "dex_conditional",
        pattern: r"if\s*\(\s*(to|recipient|_to)\s*==\s*.{0,80}?(pair|router|pool|dex).{0,40}?\).{0,20}?\{[\s\S]{0,200}?(require|revert|assert)",
        weight: 80,
        label: "DEX Conditional Gate",
        rationale: "Conditional logic applies only when the destination is a DEX address",
        max_span: 400,
    },
    RuleSpec {
        id: "asymmetric_transfer",
        pattern: r"if\s*\(\s*(from|msg\.sender|_from)\s*==\s*.{0,60}?(pair|router)[\s\S]{0,50}?else\s+if\s*\(\s*(to|recipient|_to)\s*==\s*.{0,60}?(pair|router)",
        weight: 70,
        label: "Asymmetric Transfer Logic",
        rationale: "Buy path and sell path run different code",
        max_span: 300,
    },
    RuleSpec {
        id: "sell_timing",
        pattern: r"(sellCooldown|lastSell|_sellTime|sellInterval|antiDump)[\s\S]{0,120}?require[\s\S]{0,80}?block\.(timestamp|number)",
        weight: 60,
        label: "Sell Cooldown",
        rationale: "Time-based restriction applies to the sell path",
        max_span: 300,
    },
    RuleSpec {
        id: "trading_pause",
        pattern: r"(tradingEnabled|tradingPaused|canTrade|tradingActive)\s*==\s*false[\s\S]{0,80}?require",
        weight: 50,
        label: "Pause Abuse",
        rationale: "Trading can be switched off after launch",
        max_span: 200,
    },
    RuleSpec {
        id: "sell_limit",
        pattern: r"if\s*\(\s*(to|recipient)\s*==.{0,60}?pair.{0,20}?\)[\s\S]{0,100}?require\s*\(.{0,60}?amount\s*<=\s*maxSell",
        weight: 40,
        label: "Sell Amount Limit",
        rationale: "Transaction size limits apply only to sells",
        max_span: 300,
    },
];

const FEE_BOMB_RULES: &[RuleSpec] = &[
    RuleSpec {
        id: "extreme_fee",
        pattern: r"(fee|tax|commission)\s*[=>]\s*([5-9]\d|[1-9]\d{2,})\b",
        weight: 100,
        label: "Extreme Fee Rate",
        rationale: "A fee above 50% makes exit economically impossible",
        max_span: 100,
    },
    RuleSpec {
        id: "high_sell_fee",
        pattern: r"(sellFee|sellTax|exitFee|liquidationFee)\s*[=>]\s*(2[5-9]|[3-9]\d|[1-9]\d{2,})\b",
        weight: 90,
        label: "High Sell Fee",
        rationale: "Sell fee above 25%",
        max_span: 100,
    },
    RuleSpec {
        id: "owner_fee_control",
        pattern: r"function\s+set\w*(Fee|Tax)\w*\s*\([\s\S]{0,80}?uint[\s\S]{0,80}?(public|external)[\s\S]{0,60}?(onlyOwner|admin|governance)",
        weight: 80,
        label: "Fee Manipulation",
        rationale: "The owner can change fees to any value after launch",
        max_span: 300,
    },
    RuleSpec {
        id: "uncapped_fee_sum",
        pattern: r"(totalFee|sumFee|combinedFee)\s*=\s*\w+\s*\+\s*\w+",
        weight: 75,
        label: "Uncapped Fee Sum",
        rationale: "Component fees are summed with no ceiling check",
        max_span: 150,
    },
    RuleSpec {
        id: "asymmetric_fees",
        pattern: r"(buyFee|buyTax)[\s\S]{0,100}?(sellFee|sellTax).{0,40}?[!=]",
        weight: 60,
        label: "Asymmetric Fee Structure",
        rationale: "Buying and selling are taxed differently",
        max_span: 250,
    },
    RuleSpec {
        id: "hidden_fees",
        pattern: r"uint\d*\s+private\s+\w*(fee|tax)\w*|_[a-z]{1,3}fee\s*=\s*\d+",
        weight: 50,
        label: "Hidden Fee Variables",
        rationale: "Fee state is private or obfuscated",
        max_span: 150,
    },
    RuleSpec {
        id: "multiple_fees",
        pattern: r"(marketingFee[\s\S]{0,200}?liquidityFee[\s\S]{0,200}?devFee)|(teamFee[\s\S]{0,200}?burnFee[\s\S]{0,200}?reflectionFee)",
        weight: 40,
        label: "Stacked Fee Types",
        rationale: "Several fee categories stack on every transfer",
        max_span: 500,
    },
];

const TRANSFER_GATE_RULES: &[RuleSpec] = &[
    RuleSpec {
        id: "enforced_blacklist",
        pattern: r"mapping\s*\(\s*address\s*=>\s*bool\s*\)\s*\w*blacklist\w*[\s\S]{0,400}?require\s*\(\s*!?\s*\w*blacklist",
        weight: 100,
        label: "Blacklist System",
        rationale: "A blacklist mapping is enforced on transfers",
        max_span: 500,
    },
    RuleSpec {
        id: "whitelist_only",
        pattern: r"require\s*\(\s*(whitelist|allowlist|approved)\w*\[.{0,40}?\]\s*==\s*true\s*\)[\s\S]{0,150}?_transfer",
        weight: 90,
        label: "Whitelist Only System",
        rationale: "Only whitelisted addresses can transfer",
        max_span: 300,
    },
    RuleSpec {
        id: "owner_blacklist",
        pattern: r"function\s+(blacklist|ban|block|restrict)\w*\s*\([\s\S]{0,60}?address[\s\S]{0,80}?onlyOwner",
        weight: 80,
        label: "Transfer Restriction",
        rationale: "The owner can blacklist any address at will",
        max_span: 250,
    },
    RuleSpec {
        id: "bot_detection",
        pattern: r"(isBot|_isBot|botList|antiBot)\w*[\s\S]{0,200}?require\s*\(\s*!",
        weight: 70,
        label: "Anti-Bot Gate",
        rationale: "An anti-bot flag can block arbitrary transfers",
        max_span: 300,
    },
    RuleSpec {
        id: "multiple_lists",
        pattern: r"mapping[\s\S]{0,60}?blacklist[\s\S]{0,200}?mapping[\s\S]{0,60}?whitelist",
        weight: 60,
        label: "Dual List Gating",
        rationale: "Both a blacklist and a whitelist gate transfers",
        max_span: 400,
    },
    RuleSpec {
        id: "time_restrictions",
        pattern: r"(lockedUntil|frozenUntil|restrictedUntil)\w*\s*\[[\s\S]{0,60}?\][\s\S]{0,80}?(timestamp|block\.number)",
        weight: 40,
        label: "Time-based Lock",
        rationale: "Per-address time locks restrict transfers",
        max_span: 250,
    },
];

const PROXY_UPGRADE_RULES: &[RuleSpec] = &[
    RuleSpec {
        id: "instant_upgrade",
        pattern: r"function\s+(upgradeTo|upgrade|setImplementation)\w*\s*\([\s\S]{0,120}?onlyOwner",
        weight: 100,
        label: "Instant Upgrade Path",
        rationale: "The owner can swap the implementation with no timelock",
        max_span: 250,
    },
    RuleSpec {
        id: "direct_implementation",
        pattern: r"_implementation\s*=\s*\w",
        weight: 90,
        label: "Direct Implementation Swap",
        rationale: "The implementation slot is assigned without safeguards",
        max_span: 100,
    },
    RuleSpec {
        id: "proxy_selfdestruct",
        pattern: r"(proxy|upgradeable|delegate)[\s\S]{0,500}?selfdestruct",
        weight: 85,
        label: "Self Destruct",
        rationale: "An upgradeable contract can self-destruct",
        max_span: 600,
    },
    RuleSpec {
        id: "unchecked_delegatecall",
        pattern: r"\.delegatecall\s*\(",
        weight: 75,
        label: "Delegate Call",
        rationale: "delegatecall hands full control to another contract",
        max_span: 100,
    },
    RuleSpec {
        id: "multiple_upgrade_paths",
        pattern: r"function\s+upgrade[\s\S]{0,500}?function\s+emergencyUpgrade",
        weight: 70,
        label: "Multiple Upgrade Paths",
        rationale: "More than one mechanism can replace the logic",
        max_span: 600,
    },
    RuleSpec {
        id: "storage_collision",
        pattern: r"assembly\s*\{[\s\S]{0,200}?sstore\s*\(\s*0x[0-9a-f]+",
        weight: 60,
        label: "Raw Storage Write",
        rationale: "Assembly writes straight into storage slots",
        max_span: 300,
    },
    RuleSpec {
        id: "beacon_proxy",
        pattern: r"beacon\s+.{0,40}?proxy",
        weight: 40,
        label: "Beacon Proxy",
        rationale: "Beacon proxies centralize upgrades for every clone",
        max_span: 100,
    },
];

const UNLIMITED_MINT_RULES: &[RuleSpec] = &[
    RuleSpec {
        id: "uncapped_mint",
        pattern: r"function\s+_?(mint|issue)\w*\s*\(",
        weight: 100,
        label: "Unlimited Minting",
        rationale: "A mint entry point exists; supply can be inflated",
        max_span: 100,
    },
    RuleSpec {
        id: "owner_mint_anytime",
        pattern: r"function\s+mint\w*\s*\([\s\S]{0,120}?onlyOwner[\s\S]{0,120}?\{[\s\S]{0,100}?(_mint|totalSupply\s*\+=|_balances\[[\s\S]{0,40}?\]\s*\+=)",
        weight: 90,
        label: "Owner Mint Control",
        rationale: "The owner can mint at any time, unrestricted",
        max_span: 500,
    },
    RuleSpec {
        id: "hidden_mint",
        pattern: r"function\s+\w+\s*\(.{0,80}?uint[\s\S]{0,200}?totalSupply\s*\+=",
        weight: 85,
        label: "Hidden Minting",
        rationale: "A function grows totalSupply outside the mint name",
        max_span: 400,
    },
    RuleSpec {
        id: "mutable_max_supply",
        pattern: r"(maxSupply|MAX_SUPPLY|supplyCap)\s*=[^=]",
        weight: 80,
        label: "Mutable Supply Cap",
        rationale: "The supply ceiling itself can be reassigned",
        max_span: 100,
    },
    RuleSpec {
        id: "multiple_mints",
        pattern: r"function\s+mint[\s\S]{0,500}?function\s+(emergencyMint|adminMint|devMint)",
        weight: 75,
        label: "Multiple Mint Paths",
        rationale: "Extra privileged mint entry points exist",
        max_span: 600,
    },
    RuleSpec {
        id: "mint_in_transfer",
        pattern: r"function\s+_?transfer(From)?\s*\([\s\S]{0,300}?totalSupply\s*\+=",
        weight: 70,
        label: "Mint Inside Transfer",
        rationale: "Supply grows as a side effect of transfers",
        max_span: 400,
    },
    RuleSpec {
        id: "rebase",
        pattern: r"function\s+\w*rebase\w*[\s\S]{0,200}?totalSupply",
        weight: 60,
        label: "Total Supply Manipulation",
        rationale: "A rebase mechanism rewrites the supply",
        max_span: 300,
    },
];

const DEPOSIT_TRAP_RULES: &[RuleSpec] = &[
    RuleSpec {
        id: "owner_only_withdraw",
        pattern: r"function\s+(withdraw|claim|emergency|rescue)\w*\s*\([\s\S]{0,120}?onlyOwner[\s\S]{0,200}?(transfer|call\{value|send)",
        weight: 95,
        label: "Owner-Only Withdrawal",
        rationale: "Only the owner can move funds out",
        max_span: 500,
    },
    RuleSpec {
        id: "eth_sink",
        pattern: r"(receive|fallback)\s*\(\s*\)\s*external\s+payable[\s\S]{0,400}?onlyOwner",
        weight: 85,
        label: "ETH Sink",
        rationale: "The contract accepts ETH while outflow is owner-gated",
        max_span: 500,
    },
    RuleSpec {
        id: "deposit_asymmetry",
        pattern: r"function\s+deposit[\s\S]{0,200}?function\s+withdraw[\s\S]{0,120}?require\s*\([\s\S]{0,60}?owner",
        weight: 80,
        label: "Deposit/Withdraw Asymmetry",
        rationale: "Anyone can deposit; withdrawal checks the owner",
        max_span: 500,
    },
    RuleSpec {
        id: "hidden_balance",
        pattern: r"uint\d*\s+private\s+\w*balance|mapping[\s\S]{0,60}?private[\s\S]{0,40}?balance",
        weight: 70,
        label: "Hidden Balance Tracking",
        rationale: "Deposited balances are tracked in private state",
        max_span: 200,
    },
    RuleSpec {
        id: "investment_payable",
        pattern: r"function\s+(invest|stake|contribute)\w*\s*\([\s\S]{0,80}?payable",
        weight: 60,
        label: "Payable Investment Function",
        rationale: "An investment-style payable entry point solicits funds",
        max_span: 200,
    },
    RuleSpec {
        id: "misleading_names",
        pattern: r"function\s+(claimReward|getRefund|withdrawProfit)\w*\s*\([\s\S]{0,120}?onlyOwner",
        weight: 50,
        label: "Misleading Claim Function",
        rationale: "User-sounding functions are owner-only",
        max_span: 300,
    },
];

/// Construct the six built-in detector families, in stable id order
pub fn default_detectors() -> Vec<Detector> {
    vec![
        Detector::new(
            "STE0101_1",
            "Sell-Path Block / Conditional Revert",
            "Transfers or swaps fail only on the sell path",
            Strategy::WeightedMaxDecay { decay: 0.2 },
            SELL_PATH_RULES,
        ),
        Detector::new(
            "STE0101_2",
            "High-Tax / Fee Bomb",
            "Fees so high they seal the exit",
            Strategy::AdditiveCapped,
            FEE_BOMB_RULES,
        ),
        Detector::new(
            "STE0101_3",
            "Blacklist / Whitelist-Gated",
            "Per-address gates decide who may transfer",
            Strategy::WeightedMaxDecay { decay: 0.0 },
            TRANSFER_GATE_RULES,
        ),
        Detector::new(
            "STE0103",
            "Proxy-Upgrade Rug",
            "Upgradeable proxy lets the owner swap the logic",
            Strategy::RiskAccumulation {
                base: 20.0,
                max: 100.0,
            },
            PROXY_UPGRADE_RULES,
        ),
        Detector::new(
            "STE0104",
            "Unlimited-Mint",
            "Minting authority can dilute the market at will",
            Strategy::SeverityBased,
            UNLIMITED_MINT_RULES,
        ),
        Detector::new(
            "STE0105",
            "External Deposit Sink",
            "Funds flow in freely but only the owner gets them out",
            Strategy::RiskWeighted { base: 30.0 },
            DEPOSIT_TRAP_RULES,
        ),
    ]
}
