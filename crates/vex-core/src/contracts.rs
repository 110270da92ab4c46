use alloy_sol_types::sol;

sol! {
    // ── ERC20 ───────────────────────────────────────────────────────
    interface IERC20 {
        function decimals() external view returns (uint8);
    }

    // ── Vexchange V2 Pair ───────────────────────────────────────────
    interface IVexchangeV2Pair {
        function getReserves() external view returns (
            uint112 reserve0,
            uint112 reserve1,
            uint32 blockTimestampLast
        );
        function swapFee() external view returns (uint256);
    }
}
