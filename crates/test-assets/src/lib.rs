// Copyright 2023-, Edge & Node, GraphOps, and Semiotic Labs.
// SPDX-License-Identifier: Apache-2.0

//! Canned subgraph payloads shared by the test suites.
//!
//! Constants hold single entities (or lists) as the subgraph returns them
//! for the catalog's fragments; wrap them with [`graphql_response`] to get
//! a full response body.

/// Wraps an entity payload into a GraphQL response body under `field`.
pub fn graphql_response(field: &str, payload: &str) -> String {
    format!(r#"{{"data":{{"{field}":{payload}}}}}"#)
}

/// Counter entity (`KlerosCounter`).
pub const COUNTER: &str = r#"
{
    "id": "ID",
    "courtsCount": "23",
    "disputesCount": "1000",
    "openDisputes": "12",
    "closedDisputes": "988",
    "evidencePhaseDisputes": "5",
    "commitPhaseDisputes": "1",
    "votingPhaseDisputes": "4",
    "appealPhaseDisputes": "2",
    "activeJurors": "310",
    "inactiveJurors": "1200",
    "drawnJurors": "42",
    "numberOfArbitrables": "57",
    "tokenStaked": "152034000000000000000000000",
    "totalETHFees": "1204378000000000000000",
    "totalTokenRedistributed": "2500000000000000000000000",
    "totalUSDthroughContract": "3500000"
}
"#;

/// Root court, no parent and two subcourts.
pub const COURT: &str = r#"
{
    "id": "0",
    "subcourtID": "0",
    "disputesOngoing": "3",
    "disputesClosed": "97",
    "disputesNum": "100",
    "childs": [
        {
            "id": "1"
        },
        {
            "id": "2"
        }
    ],
    "parent": null,
    "policy": {
        "policy": "/ipfs/QmTsPLHurEdmRqHqALLyJqLRmc9g7xBEoBbhmBvFuwB4Tg/general-court.json"
    },
    "tokenStaked": "98000000000000000000000000",
    "activeJurors": "150",
    "hiddenVotes": false,
    "minStake": "620000000000000000000",
    "alpha": "5000",
    "feeForJuror": "25000000000000000",
    "jurorsForCourtJump": "511",
    "timePeriods": [
        "280800",
        "583200",
        "583200",
        "388800",
        "0"
    ],
    "totalETHFees": "431000000000000000000",
    "totalTokenRedistributed": "1830000000000000000000000"
}
"#;

/// Court hierarchy: `0` with children `1` and `2`, `1` with child `3`.
pub const COURTS: &str = r#"
[
    {
        "id": "0",
        "subcourtID": "0",
        "disputesOngoing": "3",
        "disputesClosed": "97",
        "disputesNum": "100",
        "childs": [
            {
                "id": "1"
            },
            {
                "id": "2"
            }
        ],
        "parent": null,
        "policy": {
            "policy": "/ipfs/QmTsPLHurEdmRqHqALLyJqLRmc9g7xBEoBbhmBvFuwB4Tg/general-court.json"
        },
        "tokenStaked": "98000000000000000000000000",
        "activeJurors": "150",
        "hiddenVotes": false,
        "minStake": "620000000000000000000",
        "alpha": "5000",
        "feeForJuror": "25000000000000000",
        "jurorsForCourtJump": "511",
        "timePeriods": [
            "280800",
            "583200",
            "583200",
            "388800",
            "0"
        ],
        "totalETHFees": "431000000000000000000",
        "totalTokenRedistributed": "1830000000000000000000000"
    },
    {
        "id": "1",
        "subcourtID": "1",
        "disputesOngoing": "2",
        "disputesClosed": "40",
        "disputesNum": "42",
        "childs": [
            {
                "id": "3"
            }
        ],
        "parent": {
            "id": "0"
        },
        "policy": {
            "policy": "/ipfs/QmZh7Kq6bNjT6BvXRt9kPNiEwZ5ro9iomHbm3W8YfD7ufV/blockchain-court.json"
        },
        "tokenStaked": "42000000000000000000000000",
        "activeJurors": "80",
        "hiddenVotes": false,
        "minStake": "1200000000000000000000",
        "alpha": "5000",
        "feeForJuror": "30000000000000000",
        "jurorsForCourtJump": "511",
        "timePeriods": [
            "280800",
            "583200",
            "583200",
            "388800",
            "0"
        ],
        "totalETHFees": "431000000000000000000",
        "totalTokenRedistributed": "1830000000000000000000000"
    },
    {
        "id": "2",
        "subcourtID": "2",
        "disputesOngoing": "1",
        "disputesClosed": "18",
        "disputesNum": "19",
        "childs": [],
        "parent": {
            "id": "0"
        },
        "policy": {
            "policy": "/ipfs/QmRj4cGmXM2r5XaHjU5KqnVGFiSgqsSq5iUmEJvLgxzG2K/technical-court.json"
        },
        "tokenStaked": "12000000000000000000000000",
        "activeJurors": "40",
        "hiddenVotes": true,
        "minStake": "3000000000000000000000",
        "alpha": "5000",
        "feeForJuror": "40000000000000000",
        "jurorsForCourtJump": "511",
        "timePeriods": [
            "280800",
            "583200",
            "583200",
            "388800",
            "0"
        ],
        "totalETHFees": "431000000000000000000",
        "totalTokenRedistributed": "1830000000000000000000000"
    },
    {
        "id": "3",
        "subcourtID": "3",
        "disputesOngoing": "0",
        "disputesClosed": "5",
        "disputesNum": "5",
        "childs": [],
        "parent": {
            "id": "1"
        },
        "policy": null,
        "tokenStaked": "900000000000000000000000",
        "activeJurors": "9",
        "hiddenVotes": true,
        "minStake": "10000000000000000000000",
        "alpha": "5000",
        "feeForJuror": "50000000000000000",
        "jurorsForCourtJump": "511",
        "timePeriods": [
            "280800",
            "583200",
            "583200",
            "388800",
            "0"
        ],
        "totalETHFees": "431000000000000000000",
        "totalTokenRedistributed": "1830000000000000000000000"
    }
]
"#;

/// Dispute in the vote period, lightweight selection.
pub const DISPUTE: &str = r#"
{
    "id": "1040",
    "subcourtID": {
        "id": "2",
        "timePeriods": [
            "280800",
            "583200",
            "583200",
            "388800",
            "0"
        ],
        "policy": {
            "policy": "/ipfs/QmRj4cGmXM2r5XaHjU5KqnVGFiSgqsSq5iUmEJvLgxzG2K/technical-court.json"
        }
    },
    "arbitrable": {
        "id": "0xebcf3bca271b26ae4b162ba560e243055af0e679"
    },
    "creator": {
        "id": "0x0d67440946949fe293b45c52efd8a9b3d51e2522"
    },
    "currentRulling": "2",
    "period": "vote",
    "lastPeriodChange": "1650000000",
    "startTime": "1649000000",
    "ruled": false
}
"#;

/// Dispute in the vote period with one round whose two votes arrive out of `voteID` order.
pub const DISPUTE_WITH_VOTES: &str = r#"
{
    "id": "1040",
    "subcourtID": {
        "id": "2",
        "timePeriods": [
            "280800",
            "583200",
            "583200",
            "388800",
            "0"
        ],
        "policy": {
            "policy": "/ipfs/QmRj4cGmXM2r5XaHjU5KqnVGFiSgqsSq5iUmEJvLgxzG2K/technical-court.json"
        }
    },
    "arbitrable": {
        "id": "0xebcf3bca271b26ae4b162ba560e243055af0e679"
    },
    "creator": {
        "id": "0x0d67440946949fe293b45c52efd8a9b3d51e2522"
    },
    "currentRulling": "2",
    "period": "vote",
    "lastPeriodChange": "1650000000",
    "startTime": "1649000000",
    "ruled": false,
    "rounds": [
        {
            "id": "1040-0",
            "winningChoice": "2",
            "startTime": "1649000000",
            "votes": [
                {
                    "voteID": "1",
                    "address": {
                        "id": "0xAb5801a7D398351b8bE11C439e05C5B3259aeC9B"
                    },
                    "choice": "0",
                    "voted": false,
                    "timestamp": "0"
                },
                {
                    "voteID": "0",
                    "address": {
                        "id": "0x3f1c5f8ce0b2e3bc4d9b2c6d9b1f4d4e4f0a1b2c"
                    },
                    "choice": "2",
                    "voted": true,
                    "timestamp": "1650000100"
                }
            ]
        }
    ]
}
"#;

/// Ruled dispute with two rounds, newest round listed first.
pub const DISPUTE_APPEALED: &str = r#"
{
    "id": "1041",
    "subcourtID": {
        "id": "1",
        "timePeriods": [
            "280800",
            "583200",
            "583200",
            "388800",
            "0"
        ],
        "policy": {
            "policy": "/ipfs/QmZh7Kq6bNjT6BvXRt9kPNiEwZ5ro9iomHbm3W8YfD7ufV/blockchain-court.json"
        }
    },
    "arbitrable": {
        "id": "0xebcf3bca271b26ae4b162ba560e243055af0e679"
    },
    "creator": {
        "id": "0x0d67440946949fe293b45c52efd8a9b3d51e2522"
    },
    "currentRulling": "1",
    "period": "execution",
    "lastPeriodChange": "1653000000",
    "startTime": "1650500000",
    "ruled": true,
    "rounds": [
        {
            "id": "1041-1",
            "winningChoice": "1",
            "startTime": "1652000000",
            "votes": [
                {
                    "voteID": "2",
                    "address": {
                        "id": "0x8ba1f109551bd432803012645ac136ddd64dba72"
                    },
                    "choice": "1",
                    "voted": true,
                    "timestamp": "1652600300"
                },
                {
                    "voteID": "0",
                    "address": {
                        "id": "0x3f1c5f8ce0b2e3bc4d9b2c6d9b1f4d4e4f0a1b2c"
                    },
                    "choice": "1",
                    "voted": true,
                    "timestamp": "1652600100"
                },
                {
                    "voteID": "1",
                    "address": {
                        "id": "0xAb5801a7D398351b8bE11C439e05C5B3259aeC9B"
                    },
                    "choice": "2",
                    "voted": true,
                    "timestamp": "1652600200"
                }
            ]
        },
        {
            "id": "1041-0",
            "winningChoice": "2",
            "startTime": "1650500000",
            "votes": [
                {
                    "voteID": "0",
                    "address": {
                        "id": "0x8ba1f109551bd432803012645ac136ddd64dba72"
                    },
                    "choice": "2",
                    "voted": true,
                    "timestamp": "1651100000"
                }
            ]
        }
    ]
}
"#;

/// Revealed vote whose commit matches `keccak256(2, 123456789)`.
pub const VOTE: &str = r#"
{
    "id": "1040-0-0",
    "dispute": {
        "id": "1040"
    },
    "round": {
        "id": "1040-0"
    },
    "voteID": "0",
    "address": {
        "id": "0x3f1c5f8ce0b2e3bc4d9b2c6d9b1f4d4e4f0a1b2c"
    },
    "choice": "2",
    "voted": true,
    "salt": "123456789",
    "timestamp": "1650000100",
    "commit": "0xe48e7c368b5b0687d316e1a624430a90d3f7dee801c3499b639da1b0807ebf20",
    "commitGasUsed": "50000",
    "commitGasPrice": "20000000000",
    "commitGasCost": "1000000000000000",
    "castGasUsed": "60000",
    "castGasPrice": "20000000000",
    "castGasCost": "1200000000000000",
    "totalGasCost": "2200000000000000"
}
"#;

/// Policy of subcourt 2.
pub const POLICY: &str = r#"
{
    "id": "2-0xcb4aae35333193232421e86cd2e9b6c91f3b125f",
    "subcourtID": "2",
    "policy": "/ipfs/QmRj4cGmXM2r5XaHjU5KqnVGFiSgqsSq5iUmEJvLgxzG2K/technical-court.json",
    "contractAddress": "0xCb4Aae35333193232421E86Cd2E9b6C91F3B125F",
    "timestamp": "1580000000",
    "blockNumber": "9429000"
}
"#;

/// Arbitrable with the two disputes above embedded.
pub const ARBITRABLE: &str = r#"
{
    "id": "0xebcf3bca271b26ae4b162ba560e243055af0e679",
    "disputesCount": "2",
    "openDisputes": "1",
    "closedDisputes": "1",
    "evidencePhaseDisputes": "0",
    "commitPhaseDisputes": "0",
    "votingPhaseDisputes": "1",
    "appealPhaseDisputes": "0",
    "ethFees": "150000000000000000",
    "ethRewards": "75000000000000000",
    "disputes": [
        {
            "id": "1040",
            "subcourtID": {
                "id": "2",
                "timePeriods": [
                    "280800",
                    "583200",
                    "583200",
                    "388800",
                    "0"
                ],
                "policy": {
                    "policy": "/ipfs/QmRj4cGmXM2r5XaHjU5KqnVGFiSgqsSq5iUmEJvLgxzG2K/technical-court.json"
                }
            },
            "arbitrable": {
                "id": "0xebcf3bca271b26ae4b162ba560e243055af0e679"
            },
            "creator": {
                "id": "0x0d67440946949fe293b45c52efd8a9b3d51e2522"
            },
            "currentRulling": "2",
            "period": "vote",
            "lastPeriodChange": "1650000000",
            "startTime": "1649000000",
            "ruled": false,
            "rounds": [
                {
                    "id": "1040-0",
                    "winningChoice": "2",
                    "startTime": "1649000000",
                    "votes": [
                        {
                            "voteID": "1",
                            "address": {
                                "id": "0xAb5801a7D398351b8bE11C439e05C5B3259aeC9B"
                            },
                            "choice": "0",
                            "voted": false,
                            "timestamp": "0"
                        },
                        {
                            "voteID": "0",
                            "address": {
                                "id": "0x3f1c5f8ce0b2e3bc4d9b2c6d9b1f4d4e4f0a1b2c"
                            },
                            "choice": "2",
                            "voted": true,
                            "timestamp": "1650000100"
                        }
                    ]
                }
            ]
        },
        {
            "id": "1041",
            "subcourtID": {
                "id": "1",
                "timePeriods": [
                    "280800",
                    "583200",
                    "583200",
                    "388800",
                    "0"
                ],
                "policy": {
                    "policy": "/ipfs/QmZh7Kq6bNjT6BvXRt9kPNiEwZ5ro9iomHbm3W8YfD7ufV/blockchain-court.json"
                }
            },
            "arbitrable": {
                "id": "0xebcf3bca271b26ae4b162ba560e243055af0e679"
            },
            "creator": {
                "id": "0x0d67440946949fe293b45c52efd8a9b3d51e2522"
            },
            "currentRulling": "1",
            "period": "execution",
            "lastPeriodChange": "1653000000",
            "startTime": "1650500000",
            "ruled": true,
            "rounds": [
                {
                    "id": "1041-1",
                    "winningChoice": "1",
                    "startTime": "1652000000",
                    "votes": [
                        {
                            "voteID": "2",
                            "address": {
                                "id": "0x8ba1f109551bd432803012645ac136ddd64dba72"
                            },
                            "choice": "1",
                            "voted": true,
                            "timestamp": "1652600300"
                        },
                        {
                            "voteID": "0",
                            "address": {
                                "id": "0x3f1c5f8ce0b2e3bc4d9b2c6d9b1f4d4e4f0a1b2c"
                            },
                            "choice": "1",
                            "voted": true,
                            "timestamp": "1652600100"
                        },
                        {
                            "voteID": "1",
                            "address": {
                                "id": "0xAb5801a7D398351b8bE11C439e05C5B3259aeC9B"
                            },
                            "choice": "2",
                            "voted": true,
                            "timestamp": "1652600200"
                        }
                    ]
                },
                {
                    "id": "1041-0",
                    "winningChoice": "2",
                    "startTime": "1650500000",
                    "votes": [
                        {
                            "voteID": "0",
                            "address": {
                                "id": "0x8ba1f109551bd432803012645ac136ddd64dba72"
                            },
                            "choice": "2",
                            "voted": true,
                            "timestamp": "1651100000"
                        }
                    ]
                }
            ]
        }
    ]
}
"#;

/// Stake and later unstake of one juror in subcourt 2.
pub const STAKE_SETS: &str = r#"
[
    {
        "id": "0x1a2b-1",
        "address": {
            "id": "0x3f1c5f8ce0b2e3bc4d9b2c6d9b1f4d4e4f0a1b2c"
        },
        "subcourtID": "2",
        "stake": "3000000000000000000000",
        "newTotalStake": "5500000000000000000000",
        "timestamp": "1648000000"
    },
    {
        "id": "0x3c4d-7",
        "address": {
            "id": "0x3f1c5f8ce0b2e3bc4d9b2c6d9b1f4d4e4f0a1b2c"
        },
        "subcourtID": "2",
        "stake": "0",
        "newTotalStake": "2500000000000000000000",
        "timestamp": "1655000000"
    }
]
"#;

