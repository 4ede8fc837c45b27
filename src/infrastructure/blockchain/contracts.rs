//! Solidity ABI bindings for the factory, pair, ERC-20 and router contracts
//!
//! Pool LP shares are ERC-20 tokens, so `IERC20` also covers `totalSupply` and
//! `balanceOf` on a pair.

use alloy_sol_types::sol;

sol! {
    /// Pool factory
    interface IAmmFactory {
        /// Zero address when no pool exists for the pair
        function getPair(address tokenA, address tokenB) external view returns (address pair);

        function feeRateBips() external view returns (uint256);

        function allPairsLength() external view returns (uint256);
        function allPairs(uint256 index) external view returns (address pair);
    }

    /// Constant-product pool
    interface IAmmPair {
        function token0() external view returns (address);
        function token1() external view returns (address);
        function getReserves() external view returns (uint112 reserve0, uint112 reserve1, uint32 blockTimestampLast);
    }

    interface IERC20 {
        function totalSupply() external view returns (uint256);
        function balanceOf(address account) external view returns (uint256);
        function allowance(address owner, address spender) external view returns (uint256);
        function approve(address spender, uint256 amount) external returns (bool);
        function transfer(address to, uint256 amount) external returns (bool);
    }

    interface IAmmRouter {
        function swapExactTokensForTokens(
            uint256 amountIn,
            uint256 amountOutMin,
            address[] calldata path,
            address to,
            uint256 deadline
        ) external returns (uint256[] memory amounts);

        function swapTokensForExactTokens(
            uint256 amountOut,
            uint256 amountInMax,
            address[] calldata path,
            address to,
            uint256 deadline
        ) external returns (uint256[] memory amounts);

        function addLiquidity(
            address tokenA,
            address tokenB,
            uint256 amountADesired,
            uint256 amountBDesired,
            uint256 amountAMin,
            uint256 amountBMin,
            address to,
            uint256 deadline
        ) external returns (uint256 amountA, uint256 amountB, uint256 liquidity);

        function removeLiquidity(
            address tokenA,
            address tokenB,
            uint256 liquidity,
            uint256 amountAMin,
            uint256 amountBMin,
            address to,
            uint256 deadline
        ) external returns (uint256 amountA, uint256 amountB);
    }
}
